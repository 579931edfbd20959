//! Canonical text rendering of type expressions.
//!
//! Field types are carried as source text rather than resolved types, so
//! generated code can refer to generic or qualified types exactly as they
//! were written. Rendering is a pure function of the syntax node.

use std::fmt::Write;

use quote::ToTokens;
use syn::{
    AngleBracketedGenericArguments, BoundLifetimes, GenericArgument, GenericParam, Generics,
    Path, PathArguments, QSelf, ReturnType, TraitBoundModifier, Type, TypeParamBound,
    WherePredicate, punctuated::Punctuated,
};
use thiserror::Error;

/// A type expression that cannot be rendered back to source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("macro invocation `{0}!` in type position cannot be rendered")]
    Macro(String),

    #[error("unrecognised tokens `{0}` in type position")]
    Verbatim(String),

    #[error("unsupported {0} in type expression")]
    Unsupported(&'static str),
}

type RenderResult = Result<(), RenderError>;

/// Render a type expression as canonical source text.
///
/// ```
/// let ty: syn::Type = syn::parse_quote!(Option<HashMap<String, Vec<u8>>>);
/// let text = recgen_source::type_to_string(&ty).unwrap();
/// assert_eq!(text, "Option<HashMap<String, Vec<u8>>>");
/// ```
pub fn type_to_string(ty: &Type) -> Result<String, RenderError> {
    let mut out = String::new();
    render_type(&mut out, ty)?;
    Ok(out)
}

/// Generic parameters of a record, rendered for use in an `impl` header.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct RecordGenerics {
    /// Parameters with bounds, defaults removed (e.g., `<'a, T: Clone>`).
    pub impl_params: String,
    /// Parameters as arguments (e.g., `<'a, T>`).
    pub type_args: String,
    /// Where clause with a leading space (e.g., ` where T: Send`).
    pub where_clause: String,
}

impl RecordGenerics {
    /// Returns true when the record declares no generic parameters.
    pub fn is_empty(&self) -> bool {
        self.impl_params.is_empty() && self.where_clause.is_empty()
    }
}

/// Render the generics of a record declaration.
pub fn generics_to_strings(generics: &Generics) -> Result<RecordGenerics, RenderError> {
    let mut rendered = RecordGenerics::default();
    if !generics.params.is_empty() {
        let mut params = Vec::new();
        let mut args = Vec::new();
        for param in &generics.params {
            let mut out = String::new();
            match param {
                GenericParam::Lifetime(lt) => {
                    write!(out, "{}", lt.lifetime).ok();
                    if !lt.bounds.is_empty() {
                        out.push_str(": ");
                        join_display(&mut out, &lt.bounds, " + ");
                    }
                    args.push(lt.lifetime.to_string());
                }
                GenericParam::Type(tp) => {
                    out.push_str(&tp.ident.to_string());
                    if !tp.bounds.is_empty() {
                        out.push_str(": ");
                        render_bounds(&mut out, &tp.bounds)?;
                    }
                    args.push(tp.ident.to_string());
                }
                GenericParam::Const(cp) => {
                    write!(out, "const {}: ", cp.ident).ok();
                    render_type(&mut out, &cp.ty)?;
                    args.push(cp.ident.to_string());
                }
            }
            params.push(out);
        }
        rendered.impl_params = format!("<{}>", params.join(", "));
        rendered.type_args = format!("<{}>", args.join(", "));
    }

    if let Some(where_clause) = &generics.where_clause
        && !where_clause.predicates.is_empty()
    {
        let mut out = String::from(" where ");
        for (i, predicate) in where_clause.predicates.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match predicate {
                WherePredicate::Lifetime(pred) => {
                    write!(out, "{}: ", pred.lifetime).ok();
                    join_display(&mut out, &pred.bounds, " + ");
                }
                WherePredicate::Type(pred) => {
                    if let Some(lifetimes) = &pred.lifetimes {
                        render_bound_lifetimes(&mut out, lifetimes);
                    }
                    render_type(&mut out, &pred.bounded_ty)?;
                    out.push_str(": ");
                    render_bounds(&mut out, &pred.bounds)?;
                }
                _ => return Err(RenderError::Unsupported("where predicate")),
            }
        }
        rendered.where_clause = out;
    }

    Ok(rendered)
}

fn render_type(out: &mut String, ty: &Type) -> RenderResult {
    match ty {
        Type::Array(array) => {
            out.push('[');
            render_type(out, &array.elem)?;
            out.push_str("; ");
            out.push_str(&tokens_to_string(&array.len));
            out.push(']');
        }
        Type::BareFn(bare_fn) => {
            if let Some(lifetimes) = &bare_fn.lifetimes {
                render_bound_lifetimes(out, lifetimes);
            }
            if bare_fn.unsafety.is_some() {
                out.push_str("unsafe ");
            }
            if let Some(abi) = &bare_fn.abi {
                out.push_str("extern ");
                if let Some(name) = &abi.name {
                    out.push_str(&tokens_to_string(name));
                    out.push(' ');
                }
            }
            out.push_str("fn(");
            for (i, arg) in bare_fn.inputs.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                if let Some((name, _)) = &arg.name {
                    write!(out, "{name}: ").ok();
                }
                render_type(out, &arg.ty)?;
            }
            if bare_fn.variadic.is_some() {
                if !bare_fn.inputs.is_empty() {
                    out.push_str(", ");
                }
                out.push_str("...");
            }
            out.push(')');
            render_return(out, &bare_fn.output)?;
        }
        Type::Group(group) => render_type(out, &group.elem)?,
        Type::ImplTrait(impl_trait) => {
            out.push_str("impl ");
            render_bounds(out, &impl_trait.bounds)?;
        }
        Type::Infer(_) => out.push('_'),
        Type::Macro(mac) => {
            return Err(RenderError::Macro(tokens_to_string(&mac.mac.path)));
        }
        Type::Never(_) => out.push('!'),
        Type::Paren(paren) => {
            out.push('(');
            render_type(out, &paren.elem)?;
            out.push(')');
        }
        Type::Path(type_path) => match &type_path.qself {
            Some(qself) => render_qualified_path(out, qself, &type_path.path)?,
            None => render_path(out, &type_path.path)?,
        },
        Type::Ptr(ptr) => {
            out.push_str(if ptr.mutability.is_some() {
                "*mut "
            } else {
                "*const "
            });
            render_type(out, &ptr.elem)?;
        }
        Type::Reference(reference) => {
            out.push('&');
            if let Some(lifetime) = &reference.lifetime {
                write!(out, "{lifetime} ").ok();
            }
            if reference.mutability.is_some() {
                out.push_str("mut ");
            }
            render_type(out, &reference.elem)?;
        }
        Type::Slice(slice) => {
            out.push('[');
            render_type(out, &slice.elem)?;
            out.push(']');
        }
        Type::TraitObject(object) => {
            if object.dyn_token.is_some() {
                out.push_str("dyn ");
            }
            render_bounds(out, &object.bounds)?;
        }
        Type::Tuple(tuple) => {
            out.push('(');
            for (i, elem) in tuple.elems.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_type(out, elem)?;
            }
            if tuple.elems.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Type::Verbatim(tokens) => return Err(RenderError::Verbatim(tokens.to_string())),
        _ => return Err(RenderError::Unsupported("type syntax")),
    }
    Ok(())
}

fn render_return(out: &mut String, output: &ReturnType) -> RenderResult {
    if let ReturnType::Type(_, ty) = output {
        out.push_str(" -> ");
        render_type(out, ty)?;
    }
    Ok(())
}

fn render_path(out: &mut String, path: &Path) -> RenderResult {
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    render_segments(out, path, 0, path.segments.len())
}

fn render_segments(out: &mut String, path: &Path, from: usize, to: usize) -> RenderResult {
    for (i, segment) in path.segments.iter().enumerate().take(to).skip(from) {
        if i > from {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
        match &segment.arguments {
            PathArguments::None => {}
            PathArguments::AngleBracketed(args) => render_angle_args(out, args)?,
            PathArguments::Parenthesized(args) => {
                out.push('(');
                for (i, input) in args.inputs.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_type(out, input)?;
                }
                out.push(')');
                render_return(out, &args.output)?;
            }
        }
    }
    Ok(())
}

/// Renders `<T as Trait>::Assoc`, where `qself.position` counts the trait's segments.
fn render_qualified_path(out: &mut String, qself: &QSelf, path: &Path) -> RenderResult {
    out.push('<');
    render_type(out, &qself.ty)?;
    if qself.position > 0 {
        out.push_str(" as ");
        if path.leading_colon.is_some() {
            out.push_str("::");
        }
        render_segments(out, path, 0, qself.position)?;
    }
    out.push('>');
    if qself.position < path.segments.len() {
        out.push_str("::");
        render_segments(out, path, qself.position, path.segments.len())?;
    }
    Ok(())
}

fn render_angle_args(out: &mut String, args: &AngleBracketedGenericArguments) -> RenderResult {
    if args.colon2_token.is_some() {
        out.push_str("::");
    }
    out.push('<');
    for (i, arg) in args.args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match arg {
            GenericArgument::Lifetime(lifetime) => write!(out, "{lifetime}").unwrap_or(()),
            GenericArgument::Type(ty) => render_type(out, ty)?,
            GenericArgument::Const(expr) => out.push_str(&tokens_to_string(expr)),
            GenericArgument::AssocType(assoc) => {
                out.push_str(&assoc.ident.to_string());
                if let Some(generics) = &assoc.generics {
                    render_angle_args(out, generics)?;
                }
                out.push_str(" = ");
                render_type(out, &assoc.ty)?;
            }
            GenericArgument::AssocConst(assoc) => {
                write!(out, "{} = {}", assoc.ident, tokens_to_string(&assoc.value)).ok();
            }
            GenericArgument::Constraint(constraint) => {
                write!(out, "{}: ", constraint.ident).ok();
                render_bounds(out, &constraint.bounds)?;
            }
            _ => return Err(RenderError::Unsupported("generic argument")),
        }
    }
    out.push('>');
    Ok(())
}

fn render_bounds<P>(out: &mut String, bounds: &Punctuated<TypeParamBound, P>) -> RenderResult {
    for (i, bound) in bounds.iter().enumerate() {
        if i > 0 {
            out.push_str(" + ");
        }
        match bound {
            TypeParamBound::Trait(trait_bound) => {
                if trait_bound.paren_token.is_some() {
                    out.push('(');
                }
                if let TraitBoundModifier::Maybe(_) = trait_bound.modifier {
                    out.push('?');
                }
                if let Some(lifetimes) = &trait_bound.lifetimes {
                    render_bound_lifetimes(out, lifetimes);
                }
                render_path(out, &trait_bound.path)?;
                if trait_bound.paren_token.is_some() {
                    out.push(')');
                }
            }
            TypeParamBound::Lifetime(lifetime) => write!(out, "{lifetime}").unwrap_or(()),
            _ => return Err(RenderError::Unsupported("bound")),
        }
    }
    Ok(())
}

fn render_bound_lifetimes(out: &mut String, lifetimes: &BoundLifetimes) {
    out.push_str("for<");
    for (i, param) in lifetimes.lifetimes.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match param {
            GenericParam::Lifetime(lt) => write!(out, "{}", lt.lifetime).unwrap_or(()),
            other => out.push_str(&tokens_to_string(other)),
        }
    }
    out.push_str("> ");
}

fn join_display<T, P>(out: &mut String, items: &Punctuated<T, P>, sep: &str)
where
    T: std::fmt::Display,
{
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write!(out, "{item}").ok();
    }
}

fn tokens_to_string(node: &impl ToTokens) -> String {
    node.to_token_stream().to_string()
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn render(ty: Type) -> String {
        type_to_string(&ty).unwrap()
    }

    #[test]
    fn test_plain_paths() {
        assert_eq!(render(parse_quote!(String)), "String");
        assert_eq!(render(parse_quote!(std::time::Instant)), "std::time::Instant");
        assert_eq!(render(parse_quote!(::core::num::NonZeroU8)), "::core::num::NonZeroU8");
    }

    #[test]
    fn test_generic_paths() {
        assert_eq!(render(parse_quote!(Vec<String>)), "Vec<String>");
        assert_eq!(
            render(parse_quote!(Option<HashMap<K, Vec<V>>>)),
            "Option<HashMap<K, Vec<V>>>"
        );
        assert_eq!(render(parse_quote!(Cow<'a, str>)), "Cow<'a, str>");
        assert_eq!(
            render(parse_quote!(Box<dyn Iterator<Item = u8> + Send>)),
            "Box<dyn Iterator<Item = u8> + Send>"
        );
    }

    #[test]
    fn test_references_and_pointers() {
        assert_eq!(render(parse_quote!(&'a str)), "&'a str");
        assert_eq!(render(parse_quote!(&mut [u8])), "&mut [u8]");
        assert_eq!(render(parse_quote!(*const u8)), "*const u8");
        assert_eq!(render(parse_quote!(*mut T)), "*mut T");
    }

    #[test]
    fn test_arrays_and_tuples() {
        assert_eq!(render(parse_quote!([u8; 32])), "[u8; 32]");
        assert_eq!(render(parse_quote!(())), "()");
        assert_eq!(render(parse_quote!((u8,))), "(u8,)");
        assert_eq!(render(parse_quote!((u8, String))), "(u8, String)");
    }

    #[test]
    fn test_functions_and_traits() {
        assert_eq!(render(parse_quote!(fn(u8) -> bool)), "fn(u8) -> bool");
        assert_eq!(
            render(parse_quote!(Box<dyn Fn(&str) -> Result<(), E> + Send + 'static>)),
            "Box<dyn Fn(&str) -> Result<(), E> + Send + 'static>"
        );
        assert_eq!(
            render(parse_quote!(for<'a> fn(&'a str) -> &'a str)),
            "for<'a> fn(&'a str) -> &'a str"
        );
        assert_eq!(render(parse_quote!(impl Display)), "impl Display");
        assert_eq!(render(parse_quote!(!)), "!");
    }

    #[test]
    fn test_qualified_paths() {
        assert_eq!(
            render(parse_quote!(<T as Iterator>::Item)),
            "<T as Iterator>::Item"
        );
        assert_eq!(render(parse_quote!(<T>::Output)), "<T>::Output");
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let ty: Type = parse_quote!(BTreeMap<&'static str, [Option<u64>; 4]>);
        let first = type_to_string(&ty).unwrap();
        let second = type_to_string(&ty).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_macro_type_is_an_error() {
        let ty: Type = parse_quote!(field_type!());
        assert_eq!(
            type_to_string(&ty),
            Err(RenderError::Macro("field_type".to_string()))
        );
    }

    #[test]
    fn test_generics_rendering() {
        let generics: Generics = parse_quote!(<'a, T: Clone + 'a = String, const N: usize>);
        let rendered = generics_to_strings(&generics).unwrap();
        assert_eq!(rendered.impl_params, "<'a, T: Clone + 'a, const N: usize>");
        assert_eq!(rendered.type_args, "<'a, T, N>");
        assert_eq!(rendered.where_clause, "");
    }

    #[test]
    fn test_where_clause_rendering() {
        let mut generics: Generics = parse_quote!(<T>);
        generics.where_clause = Some(parse_quote!(where T: Send + ?Sized));
        let rendered = generics_to_strings(&generics).unwrap();
        assert_eq!(rendered.where_clause, " where T: Send + ?Sized");
    }

    #[test]
    fn test_empty_generics() {
        let rendered = generics_to_strings(&Generics::default()).unwrap();
        assert!(rendered.is_empty());
        assert_eq!(rendered.type_args, "");
    }
}
