//! Schema printer
//!
//! Renders descriptors as `.proto`-flavoured text, for diagnostics and
//! documentation. The output is informal: it is never parsed back, and the
//! encoder and decoder never consult it.
//!
//! A message renders as one line per field, in declaration order:
//!
//! ```text
//! message Person {
//! 	string name = 1;
//! 	int32 id = 2;
//! 	repeated PhoneNumber phones = 4;
//! }
//! ```
//!
//! and an enumeration as its variants' display names, in declaration order:
//!
//! ```text
//! enum PhoneType {
//! 	MOBILE,
//! 	HOME,
//! 	WORK
//! }
//! ```

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::conv::Message;
use crate::descriptor::{FieldKind, MessageDescriptor, ValueKind};
use crate::enumeration::{EnumDescriptor, Enumeration};

/// Renders the schema of a single message type.
#[must_use]
pub fn schema_of<M: Message>() -> String {
    render_message(M::descriptor())
}

/// Renders the schema of a single enumeration type.
#[must_use]
pub fn enum_schema<E: Enumeration>() -> String {
    render_enum(E::descriptor())
}

/// Renders `M` along with every message and enumeration reachable from its
/// fields, each exactly once, with dependencies ahead of their dependents.
///
/// Recursive message types are rendered once, at the point where the cycle
/// is first entered.
#[must_use]
pub fn schema_tree<M: Message>() -> String {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    collect(M::descriptor(), &mut seen, &mut out);
    out.join("\n")
}

fn collect(
    desc: &'static MessageDescriptor,
    seen: &mut BTreeSet<&'static str>,
    out: &mut Vec<String>,
) {
    if !seen.insert(desc.name()) {
        return;
    }
    for field in desc.fields() {
        match field.kind().value_kind() {
            ValueKind::Scalar(_) => (),
            ValueKind::Enum(get) => {
                let inner = get();
                if seen.insert(inner.name()) {
                    out.push(render_enum(inner));
                }
            }
            ValueKind::Message(get) => collect(get(), seen, out),
        }
    }
    out.push(render_message(desc));
}

/// Name of the field category as written in a schema, e.g. `sint32`,
/// `PhoneType` or `repeated string`.
#[must_use]
pub fn category_name(kind: &FieldKind) -> String {
    let elem = match kind.value_kind() {
        ValueKind::Scalar(scalar) => scalar.proto_name(),
        ValueKind::Enum(get) => get().name(),
        ValueKind::Message(get) => get().name(),
    };
    if kind.is_repeated() {
        format!("repeated {elem}")
    } else {
        elem.to_owned()
    }
}

/// Renders a message descriptor.
#[must_use]
pub fn render_message(desc: &MessageDescriptor) -> String {
    let mut ret = format!("message {} {{\n", desc.name());
    for field in desc.fields() {
        // writing to a String is infallible
        let _ = writeln!(
            ret,
            "\t{} {} = {};",
            category_name(field.kind()),
            field.name(),
            field.tag_id()
        );
    }
    ret.push_str("}\n");
    ret
}

/// Renders an enumeration descriptor.
#[must_use]
pub fn render_enum(desc: &EnumDescriptor) -> String {
    let names: Vec<_> = desc
        .variants()
        .iter()
        .map(|v| format!("\t{}", v.name))
        .collect();
    if names.is_empty() {
        format!("enum {} {{\n}}\n", desc.name())
    } else {
        format!("enum {} {{\n{}\n}}\n", desc.name(), names.join(",\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;

    #[derive(Message, Default, Debug)]
    struct Empty;

    #[derive(Enumeration, Clone, Copy, Debug, PartialEq, Eq)]
    enum PhoneType {
        #[proto(name = "MOBILE")]
        Mobile = 0,
        #[proto(name = "HOME")]
        Home = 1,
        #[proto(name = "WORK")]
        Work = 2,
    }

    #[derive(Message, Default, Debug)]
    struct Phone {
        #[proto(tag = 1)]
        number: String,
        #[proto(tag = 2, name = "type")]
        kind: PhoneType,
    }

    #[derive(Message, Default, Debug)]
    #[proto(name = "HelloRequest")]
    struct Hello {
        #[proto(tag = 1)]
        name: String,
        #[proto(tag = 2)]
        count: i32,
        #[proto(tag = 3)]
        delta: Signed<i64>,
        #[proto(tag = 4)]
        tags: Vec<String>,
        #[proto(tag = 5)]
        phones: Vec<Phone>,
        #[proto(tag = 6)]
        primary: Phone,
        #[proto(tag = 7)]
        crc: Fixed<u32>,
    }

    #[derive(Message, Default, Debug)]
    struct Node {
        #[proto(tag = 1)]
        next: Option<Box<Node>>,
        #[proto(tag = 2)]
        kind: PhoneType,
    }

    #[test]
    fn empty_message() {
        assert_eq!(Empty::schema(), "message Empty {\n}\n");
    }

    #[test]
    fn message_fields() {
        assert_eq!(
            Hello::schema(),
            "message HelloRequest {\n\
             \tstring name = 1;\n\
             \tint32 count = 2;\n\
             \tsint64 delta = 3;\n\
             \trepeated string tags = 4;\n\
             \trepeated Phone phones = 5;\n\
             \tPhone primary = 6;\n\
             \tfixed32 crc = 7;\n\
             }\n"
        );
        assert_eq!(
            Phone::schema(),
            "message Phone {\n\tstring number = 1;\n\tPhoneType type = 2;\n}\n"
        );
    }

    #[test]
    fn enumeration() {
        assert_eq!(
            enum_schema::<PhoneType>(),
            "enum PhoneType {\n\tMOBILE,\n\tHOME,\n\tWORK\n}\n"
        );
    }

    #[test]
    fn tree_lists_dependencies_once() {
        let tree = schema_tree::<Hello>();
        let expected = [
            enum_schema::<PhoneType>(),
            Phone::schema(),
            Hello::schema(),
        ]
        .join("\n");
        assert_eq!(tree, expected);
    }

    #[test]
    fn tree_of_recursive_message() {
        let tree = schema_tree::<Node>();
        assert_eq!(tree, [enum_schema::<PhoneType>(), Node::schema()].join("\n"));
        assert!(Node::schema().contains("\tNode next = 1;\n"));
    }
}
