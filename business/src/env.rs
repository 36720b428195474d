use roster_states::State;

use crate::config::{RawConfig, RuntimeEnv};

/// Facts about where the panel runs, injected once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    /// Picks the "Tap" wording over "Click" in hints.
    pub is_touch_device: bool,
    /// Turns off diagnostic logging in the table model.
    pub is_production: bool,
}

impl Environment {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw = RawConfig::from_vars(vars)?;
        Ok(Self {
            is_touch_device: raw.touch.unwrap_or(false),
            is_production: matches!(raw.env, Some(RuntimeEnv::Production)),
        })
    }

    pub fn interaction_verb(&self) -> &'static str {
        if self.is_touch_device { "Tap" } else { "Click" }
    }

    pub fn diagnostics_enabled(&self) -> bool {
        !self.is_production
    }
}

impl State for Environment {}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn development_mouse_by_default() {
        let env = Environment::from_vars(Vec::new()).unwrap();
        assert_eq!(env, Environment::default());
        assert_eq!(env.interaction_verb(), "Click");
        assert!(env.diagnostics_enabled());
    }

    #[test]
    fn production_touch_from_variables() {
        let env = Environment::from_vars(vars(&[
            ("ROSTER_ENV", "production"),
            ("ROSTER_TOUCH", "true"),
        ]))
        .unwrap();

        assert!(env.is_production);
        assert!(env.is_touch_device);
        assert_eq!(env.interaction_verb(), "Tap");
        assert!(!env.diagnostics_enabled());
    }

    #[test]
    fn unknown_env_name_is_rejected() {
        assert!(Environment::from_vars(vars(&[("ROSTER_ENV", "staging")])).is_err());
    }
}
