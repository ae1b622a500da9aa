//! The binder: fills model parameters from the decoded payload

use super::args::CallArgs;
use super::descriptor::{resolve, ModelDescriptor, ParameterDescriptor};
use super::model::ModelRegistry;
use crate::error::FrameworkError;
use crate::http::RawPayload;

/// What to do when an optional model fails validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OptionalPolicy {
    /// Bind null and run the handler anyway
    #[default]
    Lenient,
    /// Reject the request like a required model would
    Strict,
}

impl OptionalPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            Self::Strict
        } else {
            Self::Lenient
        }
    }
}

#[derive(Debug, Clone)]
struct BoundParam {
    descriptor: ParameterDescriptor,
    model: Option<ModelDescriptor>,
}

/// Binding table for one handler, resolved at registration time
#[derive(Debug, Clone)]
pub struct Binder {
    params: Vec<BoundParam>,
    policy: OptionalPolicy,
}

impl Binder {
    pub fn new(
        params: Vec<ParameterDescriptor>,
        registry: &ModelRegistry,
        policy: OptionalPolicy,
    ) -> Self {
        let params = params
            .into_iter()
            .map(|descriptor| {
                let model = resolve(&descriptor.declared, registry);
                BoundParam { descriptor, model }
            })
            .collect();
        Self { params, policy }
    }

    pub fn policy(&self) -> OptionalPolicy {
        self.policy
    }

    /// Whether any parameter is filled from the body
    pub fn has_models(&self) -> bool {
        self.params.iter().any(|p| p.model.is_some())
    }

    /// Model parameters in declaration order
    pub fn model_params(&self) -> impl Iterator<Item = (&str, &ModelDescriptor)> {
        self.params
            .iter()
            .filter_map(|p| p.model.as_ref().map(|m| (p.descriptor.name.as_str(), m)))
    }

    /// Parameters the binder leaves to the router
    pub fn unbound_params(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.params
            .iter()
            .filter(|p| p.model.is_none())
            .map(|p| &p.descriptor)
    }

    /// Bind every model parameter from `payload` into `args`
    ///
    /// Fails on the first required model that cannot be built; the handler
    /// must not run in that case.
    pub fn bind(&self, payload: &RawPayload, mut args: CallArgs) -> Result<CallArgs, FrameworkError> {
        for (name, descriptor) in self.model_params() {
            if payload.is_absent() && descriptor.optional {
                args.inject(name, None);
                continue;
            }

            match descriptor.model.build(payload) {
                Ok(bound) => args.inject(name, Some(bound)),
                Err(failure) if descriptor.optional && self.policy == OptionalPolicy::Lenient => {
                    tracing::debug!(
                        param = name,
                        model = failure.model,
                        errors = %failure.errors,
                        "Optional model failed validation, binding null"
                    );
                    args.inject(name, None);
                }
                Err(failure) => {
                    tracing::debug!(
                        param = name,
                        model = failure.model,
                        errors = %failure.errors,
                        "Model failed validation"
                    );
                    return Err(FrameworkError::Validation(failure));
                }
            }
        }
        Ok(args)
    }
}
