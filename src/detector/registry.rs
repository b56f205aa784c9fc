//! Static detector registry (spec §4.6 / §9: "dynamic discovery is not a requirement of the
//! semantics" — the directory-scanning plugin loader of the prototype is replaced here by an
//! explicit, compile-time list), mirroring `compilers::multi::MultiCompiler`'s static dispatch
//! across backends rather than a runtime-discovered set.

use super::rules;
use super::Detector;

/// An ordered, fixed collection of detectors. Registration order is load-bearing: it is the
/// primary key of the runner's finding order (spec §5).
pub struct Registry {
    detectors: Vec<Box<dyn Detector>>,
}

impl Registry {
    /// The sixteen reference detectors, in spec §4.7's table order.
    pub fn standard() -> Self {
        Self { detectors: rules::all() }
    }

    pub fn detectors(&self) -> &[Box<dyn Detector>] {
        &self.detectors
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_sixteen_detectors_with_unique_ids() {
        let registry = Registry::standard();
        assert_eq!(registry.detectors().len(), 16);
        let mut ids: Vec<&str> = registry.detectors().iter().map(|d| d.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16, "detector ids must be unique");
    }
}
