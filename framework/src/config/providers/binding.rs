use crate::binding::OptionalPolicy;
use crate::config::env::env;

/// Binding behaviour
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingConfig {
    /// Reject requests whose optional model fails validation instead of
    /// binding null
    pub strict_optional_validation: bool,
    /// Answer validation failures with the field diagnostics instead of the
    /// generic `Invalid request` body
    pub expose_validation_errors: bool,
}

impl BindingConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            strict_optional_validation: env("BIND_STRICT_OPTIONAL_VALIDATION", false),
            expose_validation_errors: env("BIND_EXPOSE_VALIDATION_ERRORS", false),
        }
    }

    pub fn builder() -> BindingConfigBuilder {
        BindingConfigBuilder::default()
    }

    pub fn optional_policy(&self) -> OptionalPolicy {
        OptionalPolicy::from_strict(self.strict_optional_validation)
    }
}

/// Builder for BindingConfig
#[derive(Default)]
pub struct BindingConfigBuilder {
    strict_optional_validation: Option<bool>,
    expose_validation_errors: Option<bool>,
}

impl BindingConfigBuilder {
    pub fn strict_optional_validation(mut self, strict: bool) -> Self {
        self.strict_optional_validation = Some(strict);
        self
    }

    pub fn expose_validation_errors(mut self, expose: bool) -> Self {
        self.expose_validation_errors = Some(expose);
        self
    }

    /// Build the BindingConfig, falling back to the environment for unset fields
    pub fn build(self) -> BindingConfig {
        let default = BindingConfig::from_env();
        BindingConfig {
            strict_optional_validation: self
                .strict_optional_validation
                .unwrap_or(default.strict_optional_validation),
            expose_validation_errors: self
                .expose_validation_errors
                .unwrap_or(default.expose_validation_errors),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_lenient() {
        assert_eq!(BindingConfig::default().optional_policy(), OptionalPolicy::Lenient);
    }

    #[test]
    fn test_builder_strict() {
        let config = BindingConfig::builder()
            .strict_optional_validation(true)
            .expose_validation_errors(true)
            .build();
        assert_eq!(config.optional_policy(), OptionalPolicy::Strict);
        assert!(config.expose_validation_errors);
    }
}
