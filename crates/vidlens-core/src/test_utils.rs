//! Shared test utilities.
//!
//! Only compiled in test builds.

/// RAII guard for environment variables in tests.
///
/// Sets or removes a variable on creation and restores the original value
/// when dropped.
#[derive(Debug)]
pub struct EnvVarGuard {
    key: String,
    original: Option<String>,
}

impl EnvVarGuard {
    /// Set `key` to `value` until the guard is dropped.
    pub fn set(key: &str, value: &str) -> Self {
        let original = std::env::var(key).ok();
        // SAFETY: tests touching the environment use distinct keys, so no
        // two threads race on the same variable.
        unsafe { std::env::set_var(key, value) };
        Self {
            key: key.to_string(),
            original,
        }
    }

    /// Remove `key` until the guard is dropped.
    pub fn unset(key: &str) -> Self {
        let original = std::env::var(key).ok();
        // SAFETY: see `EnvVarGuard::set`.
        unsafe { std::env::remove_var(key) };
        Self {
            key: key.to_string(),
            original,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        match &self.original {
            // SAFETY: see `EnvVarGuard::set`.
            Some(val) => unsafe { std::env::set_var(&self.key, val) },
            None => unsafe { std::env::remove_var(&self.key) },
        }
    }
}
