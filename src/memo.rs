//! Write-once cell for memoized fields of immutable values.

/// Write-once cell supporting both single-threaded and multi-threaded modes.
///
/// Provides unified API for both modes:
/// - Multi-threaded (default): uses `std::sync::OnceLock`
/// - Single-threaded (feature flag): uses `core::cell::OnceCell`
///
/// The stored value is computed by a pure function of the owning value, so
/// concurrent callers that race to fill the cell compute identical results
/// and only the first one is published. Readers never observe a partially
/// written value.
///
/// # Compile-time Selection
/// ```bash
/// cargo build                             # Multi-threaded (default)
/// cargo build --features single-threaded  # Single-threaded (values are !Sync)
/// ```
pub struct Memo<T> {
    #[cfg(feature = "single-threaded")]
    inner: core::cell::OnceCell<T>,

    #[cfg(not(feature = "single-threaded"))]
    inner: std::sync::OnceLock<T>,
}

impl<T> Memo<T> {
    /// Create an empty cell.
    #[inline(always)]
    pub const fn new() -> Self {
        #[cfg(feature = "single-threaded")]
        return Memo {
            inner: core::cell::OnceCell::new(),
        };

        #[cfg(not(feature = "single-threaded"))]
        return Memo {
            inner: std::sync::OnceLock::new(),
        };
    }

    /// Get the memoized value, computing it on first access.
    ///
    /// # Arguments
    /// * `init` - Pure computation of the value
    #[inline]
    pub fn get_or_init<F>(&self, init: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.inner.get_or_init(init)
    }

    /// Get the value if it has already been computed.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.inner.get()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Memo<T> {
    fn clone(&self) -> Self {
        let memo = Self::new();
        if let Some(value) = self.inner.get() {
            let _ = memo.inner.set(value.clone());
        }
        memo
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<unset>)"),
        }
    }
}
