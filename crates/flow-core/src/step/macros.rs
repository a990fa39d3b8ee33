//! Macro utilitaria para declarar pasos simples sin boilerplate.
//!
//! ```ignore
//! flow_step!(Welcome { input: (), output: String });
//! flow_step!(Address { input: String, output: String, should_load(s) { !s.input.is_empty() } });
//! ```
//!
//! El struct generado guarda la entrada recibida en el campo `input`.

#[macro_export]
macro_rules! flow_step {
    // Con predicado de carga
    ($name:ident { input: $inp:ty, output: $out:ty, should_load($self_ident:ident) $body:block $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            pub input: $inp,
        }
        impl $crate::step::FlowStep for $name {
            type Input = $inp;
            type Output = $out;
            fn create(input: Self::Input) -> Self {
                Self { input }
            }
            fn should_load(&self) -> bool {
                let $self_ident = self;
                $body
            }
        }
    };
    // Siempre carga
    ($name:ident { input: $inp:ty, output: $out:ty $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            pub input: $inp,
        }
        impl $crate::step::FlowStep for $name {
            type Input = $inp;
            type Output = $out;
            fn create(input: Self::Input) -> Self {
                Self { input }
            }
        }
    };
}
