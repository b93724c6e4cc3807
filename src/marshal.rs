//! Bidirectional XML <-> value conversion
//!
//! Parsing and rendering are pure functions over a resolved, immutable
//! type graph and a caller-owned XML node; they can run in parallel
//! across independent values.
//!
//! An element with neither attributes nor children parses to `None` (the
//! nil object) rather than an empty record — absence is a valid outcome
//! here, not an error.

use crate::documents::XmlNode;
use crate::error::{Error, Result};
use crate::types::{ContentNode, TypeDef, TypeGraph, TypeId};
use crate::values::{CompoundValue, Value};
use crate::XSI_NAMESPACE;

/// Parse an XML element into a value of the given type
///
/// Returns `None` for a structured element with no attributes and no
/// children, and for a simple element with no text.
pub fn parse(graph: &TypeGraph, id: TypeId, node: &XmlNode) -> Result<Option<Value>> {
    match graph.def(id) {
        TypeDef::Simple(simple) => match node.text() {
            None => Ok(None),
            Some(text) => Ok(Some(Value::Scalar(simple.kind.decode(text)?))),
        },
        TypeDef::Alias { base, .. } => parse(graph, *base, node),
        TypeDef::Complex(_) => parse_complex(graph, id, node),
        TypeDef::List(list) => match node.text() {
            None => Ok(None),
            Some(text) => {
                let item_kind = graph.scalar_kind(list.item)?;
                let items = text
                    .split_whitespace()
                    .map(|token| item_kind.decode(token).map(Value::Scalar))
                    .collect::<Result<Vec<Value>>>()?;
                Ok(Some(Value::List(items)))
            }
        },
        TypeDef::Union(_) => Err(Error::UnsupportedUnion {
            type_name: graph.type_name(id),
            operation: "parsing",
        }),
        TypeDef::Unresolved(_) | TypeDef::UnresolvedCustom { .. } => Err(Error::Value(format!(
            "cannot parse through unresolved type '{}'",
            graph.type_name(id)
        ))),
    }
}

fn parse_complex(graph: &TypeGraph, id: TypeId, node: &XmlNode) -> Result<Option<Value>> {
    if node.attributes().is_empty() && node.children().is_empty() {
        return Ok(None); // object is nil
    }

    let effective = graph.effective_of(id)?;
    let mut fields: Vec<(String, Value)> = Vec::new();

    // attributes, in the XML element's attribute order
    for (key, raw) in node.attributes() {
        let Some(attr) = effective.attributes.iter().find(|a| &a.name == key) else {
            continue;
        };
        fields.push((key.clone(), Value::Scalar(attr.parse(graph, raw)?)));
    }

    // elements, in effective-content order: each node consumes from the
    // full child list by name
    for (name, content) in &effective.content {
        let parsed = content.parse_children(node.children(), graph, name)?;
        fields.extend(parsed);
    }

    Ok(Some(Value::Compound(CompoundValue::new(graph, id, fields)?)))
}

/// Render a value of the given type into a parent XML node
///
/// With an explicit subtype (polymorphic substitution) an `xsi:type`
/// attribute naming it is written after all fields.
pub fn render(
    graph: &TypeGraph,
    id: TypeId,
    parent: &mut XmlNode,
    value: &Value,
    explicit_subtype: Option<TypeId>,
) -> Result<()> {
    match graph.def(id) {
        TypeDef::Simple(simple) => match value {
            Value::Nil => Ok(()),
            Value::Scalar(scalar) => {
                parent.set_text(simple.kind.encode(scalar)?);
                Ok(())
            }
            other => Err(Error::Value(format!(
                "cannot render {:?} as simple type '{}'",
                other,
                graph.type_name(id)
            ))),
        },
        TypeDef::Alias { base, .. } => render(graph, *base, parent, value, explicit_subtype),
        TypeDef::Complex(_) => render_complex(graph, id, parent, value, explicit_subtype),
        TypeDef::List(list) => match value {
            Value::Nil => Ok(()),
            Value::List(items) => {
                let item_kind = graph.scalar_kind(list.item)?;
                let encoded = items
                    .iter()
                    .map(|item| match item {
                        Value::Scalar(s) => item_kind.encode(s),
                        other => Err(Error::Value(format!(
                            "list items must be scalar, found {:?}",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<String>>>()?;
                parent.set_text(encoded.join(" "));
                Ok(())
            }
            other => Err(Error::Value(format!(
                "cannot render {:?} as list type '{}'",
                other,
                graph.type_name(id)
            ))),
        },
        TypeDef::Union(_) => Err(Error::UnsupportedUnion {
            type_name: graph.type_name(id),
            operation: "rendering",
        }),
        TypeDef::Unresolved(_) | TypeDef::UnresolvedCustom { .. } => Err(Error::Value(format!(
            "cannot render through unresolved type '{}'",
            graph.type_name(id)
        ))),
    }
}

fn render_complex(
    graph: &TypeGraph,
    id: TypeId,
    parent: &mut XmlNode,
    value: &Value,
    explicit_subtype: Option<TypeId>,
) -> Result<()> {
    let effective = graph.effective_of(id)?;

    let compound = match value {
        Value::Compound(c) => Some(c),
        Value::Nil => None,
        other => {
            return Err(Error::Value(format!(
                "cannot render {:?} as complex type '{}'",
                other,
                graph.type_name(id)
            )))
        }
    };

    // attributes render nil-safely: a missing field is simply absent
    for attr in &effective.attributes {
        let field = compound.and_then(|c| c.get(&attr.name));
        if let Some(Value::Scalar(scalar)) = field {
            parent.set_attribute(attr.name.clone(), attr.encode(graph, scalar)?);
        }
    }

    for (name, content) in &effective.content {
        match content {
            ContentNode::Element(decl) => {
                let field = compound
                    .and_then(|c| c.get(&decl.name))
                    .cloned()
                    .unwrap_or(Value::Nil);
                // an entry keyed by its own element name is the synthetic
                // simple-content wrapper: its scalar is the parent's text
                if *name == decl.name {
                    render(graph, decl.type_id, parent, &field, None)?;
                } else {
                    decl.render_into(parent, &field, graph)?;
                }
            }
            ContentNode::Group(_) => {
                if compound.is_some() {
                    content.render(parent, value, graph)?;
                }
            }
        }
    }

    if let Some(subtype) = explicit_subtype {
        parent.set_attribute_ns(XSI_NAMESPACE, "type", graph.type_name(subtype));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::QName;
    use crate::scalars::{ScalarKind, ScalarValue};
    use crate::types::{AttributeDecl, ComplexType, ElementDecl, Occurs};

    fn person_graph() -> (TypeGraph, TypeId) {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);
        let integer = graph.add_simple(QName::local("integer"), ScalarKind::Integer);

        let person = graph.add_complex(
            ComplexType::new(Some(QName::local("Person")))
                .with_content(ContentNode::sequence(vec![
                    ContentNode::element("name", string),
                    ContentNode::element("age", integer),
                ]))
                .with_attribute(AttributeDecl::new("id", integer)),
        );
        graph.resolve(person).unwrap();
        (graph, person)
    }

    #[test]
    fn test_parse_simple_no_text_is_none() {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);

        let node = XmlNode::new("value");
        assert_eq!(parse(&graph, string, &node).unwrap(), None);
    }

    #[test]
    fn test_parse_complex_empty_is_nil() {
        let (graph, person) = person_graph();
        let node = XmlNode::new("person");

        assert_eq!(parse(&graph, person, &node).unwrap(), None);
    }

    #[test]
    fn test_parse_complex() {
        let (graph, person) = person_graph();
        let node =
            XmlNode::from_str(r#"<person id="7"><name>Alice</name><age>30</age></person>"#)
                .unwrap();

        let value = parse(&graph, person, &node).unwrap().unwrap();
        let compound = value.as_compound().unwrap();
        assert_eq!(
            compound.get("name"),
            Some(&Value::Scalar(ScalarValue::String("Alice".to_string())))
        );
        assert_eq!(
            compound.get("age"),
            Some(&Value::Scalar(ScalarValue::Integer(30)))
        );
        assert_eq!(
            compound.get("id"),
            Some(&Value::Scalar(ScalarValue::Integer(7)))
        );
    }

    #[test]
    fn test_parse_matches_by_name_not_document_order() {
        let (graph, person) = person_graph();
        // children out of declaration order
        let node =
            XmlNode::from_str(r#"<person><age>30</age><name>Alice</name></person>"#).unwrap();

        let value = parse(&graph, person, &node).unwrap().unwrap();
        let compound = value.as_compound().unwrap();
        assert_eq!(
            compound.get("age"),
            Some(&Value::Scalar(ScalarValue::Integer(30)))
        );
        // declared order is preserved in the field table
        let names: Vec<&str> = compound.field_names().collect();
        assert_eq!(names, ["name", "age", "id"]);
    }

    #[test]
    fn test_parse_unknown_attribute_skipped() {
        let (graph, person) = person_graph();
        let node = XmlNode::from_str(r#"<person id="7" zone="x"><name>A</name></person>"#).unwrap();

        let value = parse(&graph, person, &node).unwrap().unwrap();
        assert!(value.as_compound().unwrap().get("zone").is_none());
    }

    #[test]
    fn test_parse_malformed_scalar_fails() {
        let (graph, person) = person_graph();
        let node = XmlNode::from_str(r#"<person><age>old</age></person>"#).unwrap();

        assert!(matches!(
            parse(&graph, person, &node),
            Err(Error::ScalarDecode(_))
        ));
    }

    #[test]
    fn test_render_complex() {
        let (graph, person) = person_graph();
        let value = Value::Compound(
            CompoundValue::new(
                &graph,
                person,
                vec![
                    ("name".to_string(), Value::Scalar(ScalarValue::String("Bob".to_string()))),
                    ("id".to_string(), Value::Scalar(ScalarValue::Integer(9))),
                ],
            )
            .unwrap(),
        );

        let mut parent = XmlNode::new("person");
        render(&graph, person, &mut parent, &value, None).unwrap();

        assert_eq!(parent.attribute("id"), Some("9"));
        assert_eq!(parent.children().len(), 1); // nil age is absent
        assert_eq!(parent.children()[0].local_name(), "name");
        assert_eq!(parent.children()[0].text(), Some("Bob"));
    }

    #[test]
    fn test_render_roundtrip() {
        let (graph, person) = person_graph();
        let node =
            XmlNode::from_str(r#"<person id="7"><name>Alice</name><age>30</age></person>"#)
                .unwrap();

        let value = parse(&graph, person, &node).unwrap().unwrap();
        let mut rendered = XmlNode::new("person");
        render(&graph, person, &mut rendered, &value, None).unwrap();

        assert_eq!(rendered, node);
    }

    #[test]
    fn test_render_explicit_subtype_sets_xsi_type() {
        let (mut graph, person) = person_graph();
        let sub = graph.add_complex(
            ComplexType::new(Some(QName::local("Employee"))).with_extension(person),
        );
        graph.resolve(sub).unwrap();

        let mut parent = XmlNode::new("person");
        render(&graph, person, &mut parent, &Value::Nil, Some(sub)).unwrap();

        assert_eq!(
            parent.attribute("{http://www.w3.org/2001/XMLSchema-instance}type"),
            Some("Employee")
        );
    }

    #[test]
    fn test_simple_content_extension_renders_text() {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);
        let measure = graph.add_complex(
            ComplexType::new(Some(QName::local("Measure")))
                .with_attribute(AttributeDecl::new("unit", string))
                .with_extension(string),
        );
        graph.resolve(measure).unwrap();

        let value = Value::Compound(
            CompoundValue::new(
                &graph,
                measure,
                vec![
                    (
                        "_value_1".to_string(),
                        Value::Scalar(ScalarValue::String("12.5".to_string())),
                    ),
                    (
                        "unit".to_string(),
                        Value::Scalar(ScalarValue::String("kg".to_string())),
                    ),
                ],
            )
            .unwrap(),
        );

        let mut parent = XmlNode::new("weight");
        render(&graph, measure, &mut parent, &value, None).unwrap();

        // the wrapped scalar becomes the element text, not a child
        assert_eq!(parent.text(), Some("12.5"));
        assert_eq!(parent.attribute("unit"), Some("kg"));
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_render_list_joins_with_space() {
        let mut graph = TypeGraph::new();
        let integer = graph.add_simple(QName::local("integer"), ScalarKind::Integer);
        let list = graph.add_list(integer);
        graph.resolve(list).unwrap();

        let value = Value::List(vec![
            Value::Scalar(ScalarValue::Integer(1)),
            Value::Scalar(ScalarValue::Integer(2)),
            Value::Scalar(ScalarValue::Integer(3)),
        ]);
        let mut parent = XmlNode::new("numbers");
        render(&graph, list, &mut parent, &value, None).unwrap();

        assert_eq!(parent.text(), Some("1 2 3"));
    }

    #[test]
    fn test_parse_list_splits_whitespace() {
        let mut graph = TypeGraph::new();
        let integer = graph.add_simple(QName::local("integer"), ScalarKind::Integer);
        let list = graph.add_list(integer);
        graph.resolve(list).unwrap();

        let mut node = XmlNode::new("numbers");
        node.set_text("1 2 3");

        let value = parse(&graph, list, &node).unwrap().unwrap();
        assert_eq!(
            value,
            Value::List(vec![
                Value::Scalar(ScalarValue::Integer(1)),
                Value::Scalar(ScalarValue::Integer(2)),
                Value::Scalar(ScalarValue::Integer(3)),
            ])
        );
    }

    #[test]
    fn test_repeated_element_collects_list() {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);
        let tags = graph.add_complex(
            ComplexType::new(Some(QName::local("Tags"))).with_content(ContentNode::sequence(
                vec![ContentNode::Element(
                    ElementDecl::new("tag", string).with_occurs(Occurs::zero_or_more()),
                )],
            )),
        );
        graph.resolve(tags).unwrap();

        let node = XmlNode::from_str("<tags><tag>a</tag><tag>b</tag></tags>").unwrap();
        let value = parse(&graph, tags, &node).unwrap().unwrap();
        let compound = value.as_compound().unwrap();
        assert_eq!(
            compound.get("tag"),
            Some(&Value::List(vec![
                Value::Scalar(ScalarValue::String("a".to_string())),
                Value::Scalar(ScalarValue::String("b".to_string())),
            ]))
        );

        let mut rendered = XmlNode::new("tags");
        render(&graph, tags, &mut rendered, &value, None).unwrap();
        assert_eq!(rendered.children().len(), 2);
    }

    #[test]
    fn test_choice_group_takes_first_matching_alternative() {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);
        let integer = graph.add_simple(QName::local("integer"), ScalarKind::Integer);

        let payment = graph.add_complex(
            ComplexType::new(Some(QName::local("Payment"))).with_content(ContentNode::Group(
                crate::types::GroupModel::choice(vec![
                    ContentNode::element("card", string),
                    ContentNode::element("invoice", integer),
                ]),
            )),
        );
        graph.resolve(payment).unwrap();

        let node = XmlNode::from_str("<payment><invoice>88</invoice></payment>").unwrap();
        let value = parse(&graph, payment, &node).unwrap().unwrap();
        let compound = value.as_compound().unwrap();
        assert_eq!(
            compound.get("invoice"),
            Some(&Value::Scalar(ScalarValue::Integer(88)))
        );
        assert_eq!(compound.get("card"), Some(&Value::Nil));

        // only the present alternative renders
        let mut rendered = XmlNode::new("payment");
        render(&graph, payment, &mut rendered, &value, None).unwrap();
        assert_eq!(rendered.children().len(), 1);
        assert_eq!(rendered.children()[0].local_name(), "invoice");
    }

    #[test]
    fn test_all_group_matches_any_document_order() {
        let mut graph = TypeGraph::new();
        let string = graph.add_simple(QName::local("string"), ScalarKind::String);

        let pair = graph.add_complex(
            ComplexType::new(Some(QName::local("Pair"))).with_content(ContentNode::Group(
                crate::types::GroupModel::all(vec![
                    ContentNode::element("first", string),
                    ContentNode::element("second", string),
                ]),
            )),
        );
        graph.resolve(pair).unwrap();

        let node = XmlNode::from_str("<pair><second>b</second><first>a</first></pair>").unwrap();
        let value = parse(&graph, pair, &node).unwrap().unwrap();
        let compound = value.as_compound().unwrap();
        assert_eq!(
            compound.get("first"),
            Some(&Value::Scalar(ScalarValue::String("a".to_string())))
        );
        assert_eq!(
            compound.get("second"),
            Some(&Value::Scalar(ScalarValue::String("b".to_string())))
        );
    }

    #[test]
    fn test_union_marshaling_unsupported() {
        let mut graph = TypeGraph::new();
        let integer = graph.add_simple(QName::local("integer"), ScalarKind::Integer);
        let union = graph.add_union(vec![integer]);
        graph.resolve(union).unwrap();

        let node = XmlNode::new("u");
        assert!(matches!(
            parse(&graph, union, &node),
            Err(Error::UnsupportedUnion { operation: "parsing", .. })
        ));

        let mut parent = XmlNode::new("u");
        assert!(matches!(
            render(&graph, union, &mut parent, &Value::Nil, None),
            Err(Error::UnsupportedUnion { operation: "rendering", .. })
        ));
    }
}
