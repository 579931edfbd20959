//! Inherent impl block builder.

use recgen_codegen::CodeBuilder;
use recgen_source::RecordGenerics;

use super::Fn;

/// Builder for an inherent `impl` block.
#[derive(Debug, Clone)]
pub struct Impl {
    type_path: String,
    generics: RecordGenerics,
    methods: Vec<Fn>,
}

impl Impl {
    pub fn new(type_path: impl Into<String>) -> Self {
        Self {
            type_path: type_path.into(),
            generics: RecordGenerics::default(),
            methods: Vec::new(),
        }
    }

    /// Carry the record's generic parameters onto the impl header.
    pub fn generics(mut self, generics: &RecordGenerics) -> Self {
        self.generics = generics.clone();
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods(&self) -> &[Fn] {
        &self.methods
    }

    fn header(&self) -> String {
        format!(
            "impl{} {}{}{} {{",
            self.generics.impl_params,
            self.type_path,
            self.generics.type_args,
            self.generics.where_clause
        )
    }

    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        builder.block(&self.header(), |b| {
            self.methods.iter().enumerate().fold(b, |b, (i, method)| {
                let b = if i > 0 { b.blank() } else { b };
                method.render(b)
            })
        })
    }

    pub fn build(&self) -> String {
        self.render(CodeBuilder::rust()).build()
    }
}
