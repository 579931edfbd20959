//! Per-field accessor decisions driven by the `accessor` tag.

use std::io;

use recgen_source::FieldInfo;

/// Tag key controlling accessor generation.
///
/// `accessor:"-"` skips the field, `accessor:"label"` renames the
/// accessor stem and the `readonly` option suppresses the setter.
pub const ACCESSOR_TAG: &str = "accessor";

/// Accessors to emit for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessor {
    /// Field name as written in the record.
    pub field: String,
    pub ty: String,
    pub getter: String,
    /// `None` for read-only fields.
    pub setter: Option<String>,
}

/// Decide which accessors each field gets, in declaration order.
pub fn plan_fields(fields: &[FieldInfo]) -> io::Result<Vec<FieldAccessor>> {
    let mut planned = Vec::with_capacity(fields.len());
    for field in fields {
        let tag = field.tag(ACCESSOR_TAG);
        let (getter, stem) = match tag.map(|t| t.name.as_str()) {
            Some("-") => continue,
            Some(name) if !name.is_empty() => {
                let stem = name.strip_prefix("r#").unwrap_or(name);
                (method_ident(name)?, stem.to_string())
            }
            _ => (field.name.clone(), field.bare_name().to_string()),
        };
        let readonly = tag.is_some_and(|t| t.has_option("readonly"));

        planned.push(FieldAccessor {
            field: field.name.clone(),
            ty: field.ty.clone(),
            getter,
            setter: (!readonly).then(|| format!("set_{stem}")),
        });
    }
    Ok(planned)
}

/// Turn a tag-supplied name into a method identifier, escaping keywords.
fn method_ident(name: &str) -> io::Result<String> {
    if syn::parse_str::<syn::Ident>(name).is_ok() {
        return Ok(name.to_string());
    }
    let raw = format!("r#{name}");
    if syn::parse_str::<syn::Ident>(&raw).is_ok() {
        return Ok(raw);
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("accessor name '{name}' is not a valid identifier"),
    ))
}

#[cfg(test)]
mod tests {
    use recgen_source::Tags;

    use super::*;

    fn field(name: &str, ty: &str, tag: Option<&str>) -> FieldInfo {
        FieldInfo {
            name: name.to_string(),
            ty: ty.to_string(),
            tags: tag.map(|t| Tags::parse(t).unwrap()),
        }
    }

    #[test]
    fn test_untagged_field_gets_both() {
        let planned = plan_fields(&[field("name", "String", None)]).unwrap();
        assert_eq!(
            planned,
            [FieldAccessor {
                field: "name".to_string(),
                ty: "String".to_string(),
                getter: "name".to_string(),
                setter: Some("set_name".to_string()),
            }]
        );
    }

    #[test]
    fn test_skip_rename_and_readonly() {
        let planned = plan_fields(&[
            field("secret", "String", Some(r#"accessor:"-""#)),
            field("n", "u32", Some(r#"accessor:"count""#)),
            field("id", "u64", Some(r#"json:"id" accessor:",readonly""#)),
        ])
        .unwrap();

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].field, "n");
        assert_eq!(planned[0].getter, "count");
        assert_eq!(planned[0].setter.as_deref(), Some("set_count"));
        assert_eq!(planned[1].getter, "id");
        assert_eq!(planned[1].setter, None);
    }

    #[test]
    fn test_raw_identifier_field() {
        let planned = plan_fields(&[field("r#type", "Kind", None)]).unwrap();
        assert_eq!(planned[0].getter, "r#type");
        assert_eq!(planned[0].setter.as_deref(), Some("set_type"));
    }

    #[test]
    fn test_keyword_rename_is_escaped() {
        let planned = plan_fields(&[field("kind", "Kind", Some(r#"accessor:"match""#))]).unwrap();
        assert_eq!(planned[0].getter, "r#match");
        assert_eq!(planned[0].setter.as_deref(), Some("set_match"));
    }

    #[test]
    fn test_raw_identifier_rename() {
        let planned = plan_fields(&[field("kind", "Kind", Some(r#"accessor:"r#type""#))]).unwrap();
        assert_eq!(planned[0].getter, "r#type");
        assert_eq!(planned[0].setter.as_deref(), Some("set_type"));
    }

    #[test]
    fn test_invalid_rename_is_an_error() {
        let err = plan_fields(&[field("kind", "Kind", Some(r#"accessor:"two words""#))])
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_other_tag_keys_are_ignored() {
        let planned =
            plan_fields(&[field("id", "u64", Some(r#"json:"-" Accessor:"-""#))]).unwrap();
        assert_eq!(planned.len(), 1);
    }
}
