use crate::analysis::context::AnalysisContext;
use crate::analysis::facts::{FactoryCall, UsageSite};
use crate::config::HiltConfig;

/// Records calls to view model factories such as `viewModels<T>()`
pub struct FactoryCallCollector {
    methods: Vec<String>,
}

impl FactoryCallCollector {
    pub fn new(config: &HiltConfig) -> Self {
        Self {
            methods: config.view_model_factories.clone(),
        }
    }

    pub fn applicable_method_names(&self) -> &[String] {
        &self.methods
    }

    /// A call of `callee` with its type arguments as written.
    /// The type argument is resolved at evaluation time.
    pub fn visit_method_call(
        &self,
        context: &AnalysisContext,
        callee: &str,
        type_arguments: &[String],
        usage: UsageSite,
    ) {
        if !self.methods.iter().any(|m| m == callee) {
            return;
        }

        context.factory_calls.insert(FactoryCall {
            usage,
            type_argument: type_arguments.first().cloned(),
        });
    }
}
