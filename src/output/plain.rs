use crate::decl::{Decl, Declaration, MethodDecl, StructDecl};
use crate::error::ScoutError;
use crate::output::Part;

/// Format each declaration as a `path:line:column name (kind)` header
/// followed by the selected part.
pub fn format_output(decls: &[Decl], part: Part) -> Result<String, ScoutError> {
    let mut output = String::new();

    for (i, decl) in decls.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let position = decl.position();
        output.push_str(&format!(
            "{}:{}:{} {} ({})\n",
            position.path,
            position.line,
            position.column,
            position.name,
            decl.kind()
        ));

        let text = format_part(decl, part)?;
        if !text.is_empty() {
            output.push_str(&text);
            if !text.ends_with('\n') {
                output.push('\n');
            }
        }
    }

    Ok(output)
}

/// Text of one part of a declaration.
pub fn format_part(decl: &Decl, part: Part) -> Result<String, ScoutError> {
    part.check(decl.kind())?;

    let text = match decl {
        Decl::Function(f) => match part {
            Part::Definition => f.callable.definition(),
            Part::Body => f.callable.body.clone(),
            Part::Signature => f.callable.signature.clone(),
            Part::Comment => f.callable.comments.clone(),
            _ => f.callable.return_type(),
        },
        Decl::Method(m) => method_part(m, part),
        Decl::Struct(s) => struct_part(s, part),
    };
    Ok(text)
}

fn method_part(m: &MethodDecl, part: Part) -> String {
    match part {
        Part::Definition => m.callable.definition(),
        Part::Body => m.callable.body.clone(),
        Part::Signature => m.callable.signature.clone(),
        Part::Comment => m.callable.comments.clone(),
        Part::Return => m.callable.return_type(),
        Part::Receiver => m.receiver.type_text.clone(),
        Part::ReceiverFields => join_attrs(m.fields_accessed.iter()),
        _ => join_attrs(m.methods_called.iter()),
    }
}

fn struct_part(s: &StructDecl, part: Part) -> String {
    match part {
        Part::Definition => s.definition(),
        Part::Body => s.body.clone(),
        Part::Signature => s.signature(),
        Part::Comment => s.comments.clone(),
        Part::Fields => {
            let fields: Vec<String> = s
                .fields
                .iter()
                .map(|f| format!("{} {}", f.name, f.type_name))
                .collect();
            join_attrs(fields.iter().map(String::as_str))
        }
        _ => join_attrs(s.methods.iter().map(|m| m.name())),
    }
}

/// `[ a,b,c ]`
pub fn join_attrs<'a>(attrs: impl Iterator<Item = &'a str>) -> String {
    format!("[ {} ]", attrs.collect::<Vec<_>>().join(","))
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SourceFile;
    use crate::query::{MethodQuery, StructQuery};
    use crate::scout;

    const SOURCE: &str = r#"package cars

// Car is a car.
type Car struct {
	Make, Model string
	Year        int
}

// DisplayDetails prints the car.
func (c *Car) DisplayDetails() string {
	return c.describe(c.Make, c.Model)
}

func (c *Car) describe(a, b string) string { return a + b }
"#;

    fn file() -> SourceFile {
        SourceFile::from_source("cars.go", SOURCE).unwrap()
    }

    fn method(name: &str) -> Decl {
        let file = file();
        let query = MethodQuery {
            name: Some(name.to_string()),
            ..Default::default()
        };
        let found = scout::methods(&file, &query).next().unwrap();
        Decl::Method(found)
    }

    #[test]
    fn join_attrs_format() {
        assert_eq!(join_attrs(["a", "b"].into_iter()), "[ a,b ]");
        assert_eq!(join_attrs(std::iter::empty()), "[  ]");
    }

    #[test]
    fn header_and_definition() {
        let out = format_output(&[method("DisplayDetails")], Part::Definition).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("cars.go:10:1 DisplayDetails (method)"));
        assert_eq!(lines.next(), Some("// DisplayDetails prints the car."));
        assert_eq!(lines.next(), Some("func (c *Car) DisplayDetails() string {"));
    }

    #[test]
    fn method_parts() {
        let decl = method("DisplayDetails");
        assert_eq!(format_part(&decl, Part::Receiver).unwrap(), "*Car");
        assert_eq!(format_part(&decl, Part::ReceiverFields).unwrap(), "[ Make,Model ]");
        assert_eq!(format_part(&decl, Part::ReceiverMethods).unwrap(), "[ describe ]");
        assert_eq!(format_part(&decl, Part::Return).unwrap(), "string");
        assert_eq!(
            format_part(&decl, Part::Signature).unwrap(),
            "func (c *Car) DisplayDetails() string"
        );
    }

    #[test]
    fn struct_parts() {
        let file = file();
        let query = StructQuery::default();
        let decl = Decl::Struct(scout::structs(&file, &query).next().unwrap());
        assert_eq!(
            format_part(&decl, Part::Fields).unwrap(),
            "[ Make string,Model string,Year int ]"
        );
        assert_eq!(
            format_part(&decl, Part::Methods).unwrap(),
            "[ DisplayDetails,describe ]"
        );
        assert_eq!(format_part(&decl, Part::Comment).unwrap(), "// Car is a car.");
        assert_eq!(format_part(&decl, Part::Signature).unwrap(), "Car");
    }

    #[test]
    fn inapplicable_part_is_rejected() {
        let err = format_part(&method("describe"), Part::Fields).unwrap_err();
        assert!(matches!(err, ScoutError::InvalidQuery(_)));
        assert!(err.to_string().contains("receiver-fields"));
    }
}
