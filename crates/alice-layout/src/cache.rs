//! Name resolution cache.
//!
//! Layout items refer to controls and windows by name. Resolving a name is a
//! linear scan of the host's lists, so the last resolved index is remembered
//! per owning container and revalidated on every access: a cached index is
//! trusted only while it is in range and the live object there still carries
//! the name.

use rustc_hash::FxHashMap;

use crate::host::{ControlIndex, LayoutHost, WindowIndex};

/// Lookup counters, mostly useful in tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered by a still-valid cached index
    pub hits: u64,
    /// Lookups that fell back to a full scan
    pub rescans: u64,
}

/// Side-table of resolved names, keyed by owning container.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    windows: FxHashMap<String, WindowIndex>,
    controls: FxHashMap<WindowIndex, FxHashMap<String, ControlIndex>>,
    stats: CacheStats,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Forget every resolved name.
    pub fn clear(&mut self) {
        self.windows.clear();
        self.controls.clear();
    }

    /// Resolve a window name against the global window list.
    pub fn resolve_window<H>(&mut self, host: &H, name: &str) -> Option<WindowIndex>
    where
        H: LayoutHost + ?Sized,
    {
        if let Some(&index) = self.windows.get(name) {
            if index < host.window_count() && host.window_name(index) == Some(name) {
                self.stats.hits += 1;
                return Some(index);
            }
        }

        self.stats.rescans += 1;
        match host.find_window(name) {
            Some(index) => {
                self.windows.insert(name.to_owned(), index);
                Some(index)
            }
            None => {
                self.windows.remove(name);
                None
            }
        }
    }

    /// Resolve a control name against `window`'s child list.
    pub fn resolve_control<H>(&mut self, host: &H, window: WindowIndex, name: &str) -> Option<ControlIndex>
    where
        H: LayoutHost + ?Sized,
    {
        let table = self.controls.entry(window).or_default();
        if let Some(&index) = table.get(name) {
            if index < host.control_count(window) && host.control_name(window, index) == Some(name) {
                self.stats.hits += 1;
                return Some(index);
            }
        }

        self.stats.rescans += 1;
        match host.find_control(window, name) {
            Some(index) => {
                table.insert(name.to_owned(), index);
                Some(index)
            }
            None => {
                table.remove(name);
                None
            }
        }
    }
}
