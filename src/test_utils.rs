pub fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
}

/// Case count for `proptest!` blocks; `PROPTEST_CASES` overrides `default`.
pub fn proptest_cases(default: u32) -> u32 {
    env_u32("PROPTEST_CASES").unwrap_or(default).max(1)
}

#[cfg(test)]
mod tests {
    use super::env_u32;

    #[test]
    fn env_u32_missing_variable() {
        assert_eq!(env_u32("FCA_TEST_UTILS_UNSET_VARIABLE"), None);
    }
}
