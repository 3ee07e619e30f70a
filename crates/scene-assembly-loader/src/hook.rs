//! Post-binding package hook
//!
//! Embedding applications use the hook to attach render-side state, typically
//! a per-fragment lookup texture sized by the fragment's submesh count.

use scene_assembly_core::Package;

/// Called once for every package bound to a fragment index
pub trait PackageHook: Send + Sync {
    /// Inspect or modify a freshly bound package
    ///
    /// `texture_dimensions` is the `(width, height)` grid holding one texel
    /// per submesh of the fragment.
    fn on_package_bound(&self, fragment: &str, package: &mut Package, texture_dimensions: (u32, u32));
}

impl<F> PackageHook for F
where
    F: Fn(&str, &mut Package, (u32, u32)) + Send + Sync,
{
    fn on_package_bound(&self, fragment: &str, package: &mut Package, texture_dimensions: (u32, u32)) {
        self(fragment, package, texture_dimensions)
    }
}
