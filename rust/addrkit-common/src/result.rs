pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Verifies that a slice argument has exactly the expected number of elements.
#[macro_export]
macro_rules! verify_len {
    ($name:ident, $expected:expr) => {{
        $crate::result::verify_len($name.len(), $expected, stringify!($name))?;
    }};
}

#[inline]
pub fn verify_len(actual: usize, expected: usize, name: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        length_mismatch(name, expected, actual)
    }
}

#[cold]
pub fn length_mismatch(name: &str, expected: usize, actual: usize) -> Result<()> {
    Err(crate::error::Error::length_mismatch(name, expected, actual))
}
