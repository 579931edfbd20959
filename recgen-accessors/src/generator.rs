use std::io;

use recgen_codegen::{CodeBuilder, OutputSink, RecordGenerator, RecordInfo};

use crate::{
    ast::{Fn, Impl, Param},
    plan::{FieldAccessor, plan_fields},
};

/// Which accessors a generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
    Both,
}

impl AccessorKind {
    /// Generator name, also the default output file suffix.
    pub fn name(self) -> &'static str {
        match self {
            Self::Getter => "getter",
            Self::Setter => "setter",
            Self::Both => "accessors",
        }
    }

    fn getters(self) -> bool {
        matches!(self, Self::Getter | Self::Both)
    }

    fn setters(self) -> bool {
        matches!(self, Self::Setter | Self::Both)
    }

    /// Render one impl block for `record`.
    pub fn render(self, record: &RecordInfo<'_>) -> io::Result<String> {
        let fields = plan_fields(record.fields())?;
        let mut block = Impl::new(record.qualified_name()).generics(record.generics());

        for field in &fields {
            if self.getters() {
                block = block.method(getter(field));
            }
            if self.setters()
                && let Some(setter) = setter(field)
            {
                block = block.method(setter);
            }
        }

        tracing::debug!(
            record = record.name(),
            kind = self.name(),
            methods = block.methods().len(),
            "rendered accessors"
        );
        Ok(block.render(CodeBuilder::rust()).build())
    }
}

fn getter(field: &FieldAccessor) -> Fn {
    Fn::new(&field.getter)
        .doc(format!("Returns a reference to `{}`.", field.field))
        .param(Param::receiver("&self"))
        .returns(format!("&{}", field.ty))
        .body_line(format!("&self.{}", field.field))
}

fn setter(field: &FieldAccessor) -> Option<Fn> {
    let name = field.setter.as_ref()?;
    Some(
        Fn::new(name)
            .doc(format!("Sets `{}`.", field.field))
            .param(Param::receiver("&mut self"))
            .param(Param::new("value", &field.ty))
            .body_line(format!("self.{} = value;", field.field)),
    )
}

fn write_impl(
    kind: AccessorKind,
    record: &RecordInfo<'_>,
    sink: &mut OutputSink<'_>,
) -> io::Result<()> {
    sink.write_str(&kind.render(record)?)
}

/// Emits `pub fn field(&self) -> &Type` for every field.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetterGenerator;

impl RecordGenerator for GetterGenerator {
    fn name(&self) -> &str {
        AccessorKind::Getter.name()
    }

    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()> {
        write_impl(AccessorKind::Getter, record, sink)
    }
}

/// Emits `pub fn set_field(&mut self, value: Type)` for every writable field.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetterGenerator;

impl RecordGenerator for SetterGenerator {
    fn name(&self) -> &str {
        AccessorKind::Setter.name()
    }

    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()> {
        write_impl(AccessorKind::Setter, record, sink)
    }
}

/// Emits getters and setters in a single impl block.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessorGenerator;

impl RecordGenerator for AccessorGenerator {
    fn name(&self) -> &str {
        AccessorKind::Both.name()
    }

    fn generate(&self, record: &RecordInfo<'_>, sink: &mut OutputSink<'_>) -> io::Result<()> {
        write_impl(AccessorKind::Both, record, sink)
    }
}

/// Boxed generator for `kind`.
pub fn generator_for(kind: AccessorKind) -> Box<dyn RecordGenerator> {
    match kind {
        AccessorKind::Getter => Box::new(GetterGenerator),
        AccessorKind::Setter => Box::new(SetterGenerator),
        AccessorKind::Both => Box::new(AccessorGenerator),
    }
}
