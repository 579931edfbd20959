//! Method builder.

use recgen_codegen::CodeBuilder;

/// A method parameter. An empty type marks a receiver (`&self`).
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn receiver(receiver: impl Into<String>) -> Self {
        Self::new(receiver, "")
    }
}

/// Builder for an inherent method.
#[derive(Debug, Clone)]
pub struct Fn {
    name: String,
    doc: Option<String>,
    attrs: Vec<String>,
    params: Vec<Param>,
    return_type: Option<String>,
    body: Vec<String>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }

    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        let builder = match &self.doc {
            Some(doc) => builder.rust_doc(doc),
            None => builder,
        };

        let builder = self
            .attrs
            .iter()
            .fold(builder, |b, attr| b.linef(format_args!("#[{attr}]")));

        let params = self
            .params
            .iter()
            .map(|p| {
                if p.ty.is_empty() {
                    p.name.clone()
                } else {
                    format!("{}: {}", p.name, p.ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let signature = match &self.return_type {
            Some(ret) => format!("pub fn {}({}) -> {} {{", self.name, params, ret),
            None => format!("pub fn {}({}) {{", self.name, params),
        };

        builder.block(&signature, |b| {
            self.body.iter().fold(b, |b, line| b.line(line))
        })
    }

    pub fn build(&self) -> String {
        self.render(CodeBuilder::rust()).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getter_shape() {
        let f = Fn::new("name")
            .param(Param::receiver("&self"))
            .returns("&String")
            .body_line("&self.name")
            .build();
        assert_eq!(f, "pub fn name(&self) -> &String {\n    &self.name\n}\n");
    }

    #[test]
    fn test_setter_shape() {
        let f = Fn::new("set_name")
            .param(Param::receiver("&mut self"))
            .param(Param::new("value", "String"))
            .body_line("self.name = value;")
            .build();
        assert_eq!(
            f,
            "pub fn set_name(&mut self, value: String) {\n    self.name = value;\n}\n"
        );
    }

    #[test]
    fn test_doc_and_attrs() {
        let f = Fn::new("id")
            .doc("Returns the id.")
            .attr("inline")
            .attr("must_use")
            .build();
        assert_eq!(
            f,
            "/// Returns the id.\n#[inline]\n#[must_use]\npub fn id() {\n}\n"
        );
    }
}
