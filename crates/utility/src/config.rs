use std::fmt::Display;
use std::str::FromStr;

/// Reads `key` from the environment, parsing it as `T`. Falls back to
/// `default` when the variable is unset, but panics when it's set to
/// something that doesn't parse — a present tuning value that's nonsensical
/// should stop the process rather than run silently with the default.
pub fn env_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|err| panic!("environment variable {key}={raw:?} is invalid: {err}")),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_when_unset() {
        std::env::remove_var("UTILITY_CONFIG_TEST_UNSET");
        assert_eq!(env_or_default("UTILITY_CONFIG_TEST_UNSET", 42u32), 42);
    }

    #[test]
    #[should_panic]
    fn panics_on_invalid_value() {
        std::env::set_var("UTILITY_CONFIG_TEST_INVALID", "not-a-number");
        let _: u32 = env_or_default("UTILITY_CONFIG_TEST_INVALID", 1);
    }
}
