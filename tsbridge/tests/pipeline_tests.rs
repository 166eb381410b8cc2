//! Integration tests for full generation runs.

use std::sync::Arc;

use tsbridge::generator::{MapKeyPolicy, UnresolvedPolicy};
use tsbridge::ir::{
    AliasDef, Declaration, FieldDef, InterfaceDecl, MapKey, Namespace, ResolvedField, SourceType,
    StructDef, TypeExpr, TypeGraph,
};
use tsbridge::{
    ConfigError, DiagnosticKind, GroupConfig, NullabilityMode, Pipeline, RunConfig, RunError,
    RunOutput,
};

// =============================================================================
// Helpers
// =============================================================================

fn run(graph: &TypeGraph, config: RunConfig) -> RunOutput {
    Pipeline::new(graph, config)
        .run()
        .expect("run should succeed")
}

fn names(declarations: &[Arc<Declaration>]) -> Vec<&str> {
    declarations.iter().map(|d| d.name()).collect()
}

fn interface<'a>(declarations: &'a [Arc<Declaration>], name: &str) -> &'a InterfaceDecl {
    declarations
        .iter()
        .find_map(|d| match d.as_ref() {
            Declaration::Interface(i) if i.name == name => Some(i),
            _ => None,
        })
        .unwrap_or_else(|| panic!("no interface {name}"))
}

fn field<'a>(decl: &'a InterfaceDecl, name: &str) -> &'a ResolvedField {
    decl.fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no field {name} in {}", decl.name))
}

fn order_graph() -> TypeGraph {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("Order")
            .with_field(FieldDef::new("ID", SourceType::Number).with_struct_tag(r#"json:"id""#))
            .with_field(
                FieldDef::new("Note", SourceType::pointer(SourceType::Text))
                    .with_struct_tag(r#"json:"note,omitempty""#),
            ),
    );
    graph
}

/// Shop graph shared by several groups.
fn shop_graph() -> TypeGraph {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("CreateOrderRequest")
            .with_field(
                FieldDef::new("Customer", SourceType::named("Customer"))
                    .with_struct_tag(r#"json:"customer" binding:"required""#),
            )
            .with_field(
                FieldDef::new("Items", SourceType::sequence(SourceType::named("LineItem")))
                    .with_struct_tag(r#"json:"items" binding:"required,min=1""#),
            ),
    );
    graph.push(
        StructDef::new("OrderResponse")
            .with_field(FieldDef::new("ID", SourceType::Number).with_struct_tag(r#"json:"id""#))
            .with_field(
                FieldDef::new("Customer", SourceType::named("Customer"))
                    .with_struct_tag(r#"json:"customer""#),
            )
            .with_field(
                FieldDef::new("PlacedAt", SourceType::Timestamp)
                    .with_struct_tag(r#"json:"placed_at""#),
            ),
    );
    graph.push(
        StructDef::new("Customer")
            .with_field(FieldDef::new("Name", SourceType::Text).with_struct_tag(r#"json:"name""#))
            .with_field(
                FieldDef::new("Address", SourceType::pointer(SourceType::named("Address")))
                    .with_struct_tag(r#"json:"address,omitempty""#),
            ),
    );
    graph.push(
        StructDef::new("LineItem")
            .with_field(FieldDef::new("SKU", SourceType::Text).with_struct_tag(r#"json:"sku""#))
            .with_field(
                FieldDef::new("Quantity", SourceType::Number)
                    .with_struct_tag(r#"json:"quantity" validate:"gte=1""#),
            ),
    );
    graph.push(
        StructDef::new("Address")
            .with_field(FieldDef::new("City", SourceType::Text).with_struct_tag(r#"json:"city""#)),
    );
    graph
}

fn shop_config() -> RunConfig {
    RunConfig::new()
        .with_group(GroupConfig::new("requests", ["CreateOrderRequest"]))
        .with_group(GroupConfig::new("responses", ["OrderResponse"]))
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn order_scenario() {
    let output = run(&order_graph(), RunConfig::new());
    let order = interface(&output.combined, "Order");

    assert_eq!(order.fields.len(), 2);
    let id = field(order, "id");
    assert_eq!(id.type_expr, TypeExpr::number());
    assert!(!id.optional && !id.nullable);

    let note = field(order, "note");
    assert_eq!(note.type_expr, TypeExpr::string());
    assert!(note.optional && note.nullable);
}

#[test]
fn groups_merge_in_processing_order() {
    let output = run(&shop_graph(), shop_config());

    assert_eq!(
        names(&output.groups[0].declarations),
        vec!["CreateOrderRequest", "Customer", "Address", "LineItem"]
    );
    assert_eq!(
        names(&output.groups[1].declarations),
        vec!["OrderResponse", "Customer", "Address"]
    );
    assert_eq!(
        names(&output.combined),
        vec![
            "CreateOrderRequest",
            "Customer",
            "Address",
            "LineItem",
            "OrderResponse"
        ]
    );
}

#[test]
fn processing_order_changes_combined_order() {
    let config = shop_config().with_processing_order(["responses", "requests"]);
    let output = run(&shop_graph(), config);

    assert_eq!(output.groups[0].group, "responses");
    assert_eq!(
        names(&output.combined),
        vec![
            "OrderResponse",
            "Customer",
            "Address",
            "CreateOrderRequest",
            "LineItem"
        ]
    );
}

#[test]
fn runs_are_idempotent() {
    let graph = shop_graph();
    let first = run(&graph, shop_config());
    for _ in 0..16 {
        assert_eq!(run(&graph, shop_config()), first);
    }
}

#[test]
fn many_parallel_groups_are_deterministic() {
    let graph = shop_graph();
    let mut config = RunConfig::new();
    for index in 0..32 {
        let root = if index % 2 == 0 {
            "CreateOrderRequest"
        } else {
            "OrderResponse"
        };
        config = config.with_group(GroupConfig::new(format!("g{index}"), [root]));
    }

    let first = run(&graph, config.clone());
    assert_eq!(first.groups.len(), 32);
    assert_eq!(names(&first.combined).len(), 5);
    for _ in 0..8 {
        assert_eq!(run(&graph, config.clone()), first);
    }
}

#[test]
fn merged_names_are_unique() {
    let output = run(&shop_graph(), shop_config());
    let mut seen = std::collections::HashSet::new();
    for declaration in &output.combined {
        assert!(
            seen.insert(declaration.name()),
            "{} twice",
            declaration.name()
        );
    }
}

#[test]
fn validation_rules_are_documented() {
    let output = run(&shop_graph(), shop_config());
    let request = interface(&output.combined, "CreateOrderRequest");
    assert_eq!(
        field(request, "items").doc_lines,
        vec!["@validation", "  - binding: required,min=1"]
    );
    assert!(!field(request, "items").optional);
}

// =============================================================================
// Conflicts
// =============================================================================

#[test]
fn conflicting_contexts_abort_the_run() {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("Search").with_field(
            FieldDef::new("Page", SourceType::Number)
                .with_struct_tag(r#"json:"page" query:"p,omitempty""#),
        ),
    );

    let config = RunConfig::new()
        .with_group(GroupConfig::new("body", ["Search"]))
        .with_group(
            GroupConfig::new("params", ["Search"]).with_namespaces(vec![Namespace::Query]),
        );

    let err = Pipeline::new(&graph, config).run().unwrap_err();
    match err {
        RunError::DeclarationConflict {
            name,
            first_group,
            second_group,
            field,
            ..
        } => {
            assert_eq!(name, "Search");
            assert_eq!(first_group, "body");
            assert_eq!(second_group, "params");
            assert_eq!(field.as_deref(), Some("page"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn same_name_different_definitions_conflict() {
    let mut graph = TypeGraph::new();
    let first = graph.push(
        StructDef::new("Item").with_field(FieldDef::new("ID", SourceType::Number)),
    );
    let second = graph.push(
        StructDef::new("Item").with_field(FieldDef::new("ID", SourceType::Text)),
    );
    graph.push(
        StructDef::new("A")
            .with_field(FieldDef::new("Item", SourceType::named_def("Item", first))),
    );
    graph.push(
        StructDef::new("B")
            .with_field(FieldDef::new("Item", SourceType::named_def("Item", second))),
    );

    let config = RunConfig::new()
        .with_group(GroupConfig::new("a", ["A"]))
        .with_group(GroupConfig::new("b", ["B"]));
    let err = Pipeline::new(&graph, config).run().unwrap_err();
    assert!(matches!(
        err,
        RunError::DeclarationConflict { ref name, .. } if name == "Item"
    ));
}

#[test]
fn nullability_override_conflicts_with_default_group() {
    let config = RunConfig::new()
        .with_group(GroupConfig::new("modern", ["Order"]))
        .with_group(
            GroupConfig::new("legacy", ["Order"])
                .with_nullability(NullabilityMode::LegacyOptionalOnly),
        );
    let mut graph = TypeGraph::new();
    graph.push(StructDef::new("Order").with_field(
        FieldDef::new("Note", SourceType::Text).with_struct_tag(r#"json:"note,omitempty""#),
    ));

    let err = Pipeline::new(&graph, config).run().unwrap_err();
    assert!(matches!(err, RunError::DeclarationConflict { .. }));
}

#[test]
fn groups_agreeing_through_different_namespaces_merge() {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("User")
            .with_doc("A user")
            .with_field(
                FieldDef::new("Email", SourceType::Text)
                    .with_struct_tag(r#"json:"email" form:"email" validate:"email""#),
            ),
    );
    let config = RunConfig::new()
        .with_group(GroupConfig::new("json", ["User"]).with_namespaces(vec![Namespace::Json]))
        .with_group(GroupConfig::new("form", ["User"]).with_namespaces(vec![Namespace::Form]));

    let output = run(&graph, config);
    assert_eq!(names(&output.combined), vec!["User"]);
}

// =============================================================================
// Placeholders and policies
// =============================================================================

#[test]
fn placeholders_are_deduplicated_across_groups() {
    let mut graph = TypeGraph::new();
    graph.push(StructDef::new("A").with_field(FieldDef::new("Amount", SourceType::named("Money"))));
    graph.push(StructDef::new("B").with_field(FieldDef::new(
        "Prices",
        SourceType::mapping(MapKey::Text, SourceType::named("Money")),
    )));

    let config = RunConfig::new()
        .with_group(GroupConfig::new("a", ["A"]))
        .with_group(GroupConfig::new("b", ["B"]));
    let output = run(&graph, config);

    assert_eq!(names(&output.combined), vec!["A", "Money", "B"]);
    assert!(output.combined[1].is_placeholder());
    assert_eq!(output.diagnostics.len(), 2);
    assert_eq!(output.diagnostics[0].group, "a");
    assert_eq!(output.diagnostics[1].group, "b");
    assert!(output
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::UnresolvedReference));
}

#[test]
fn unknown_types_with_one_label_share_a_placeholder() {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("A")
            .with_field(FieldDef::new("Price", SourceType::unknown("Decimal")))
            .with_field(FieldDef::new("Tax", SourceType::unknown("Decimal"))),
    );
    graph.push(StructDef::new("B").with_field(FieldDef::new(
        "Total",
        SourceType::pointer(SourceType::unknown("Decimal")),
    )));

    let config = RunConfig::new()
        .with_group(GroupConfig::new("a", ["A"]))
        .with_group(GroupConfig::new("b", ["B"]));
    let output = run(&graph, config);

    assert_eq!(names(&output.combined), vec!["A", "Decimal", "B"]);
    assert!(output.combined[1].is_placeholder());
    assert_eq!(names(&output.groups[0].declarations), vec!["A", "Decimal"]);
    assert!(output.diagnostics.is_empty());
}

fn cart_graph(second_item: StructDef) -> TypeGraph {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("Item")
            .with_field(FieldDef::new("SKU", SourceType::Text).with_struct_tag(r#"json:"sku""#)),
    );
    graph.push(second_item);
    graph.push(StructDef::new("Cart").with_field(FieldDef::new("Item", SourceType::named("Item"))));
    graph
}

#[test]
fn shared_names_are_referenced_not_shadowed() {
    let twin = StructDef::new("Item")
        .with_field(FieldDef::new("SKU", SourceType::Text).with_struct_tag(r#"json:"sku""#));
    let graph = cart_graph(twin);

    let explicit = RunConfig::new().with_group(GroupConfig::new("cart", ["Item", "Cart"]));
    for config in [RunConfig::new(), explicit] {
        let output = run(&graph, config);

        assert_eq!(names(&output.combined), vec!["Item", "Cart"]);
        assert!(!output.combined[0].is_placeholder());
        let cart = interface(&output.combined, "Cart");
        assert_eq!(field(cart, "item").type_expr, TypeExpr::reference("Item"));
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(
            output.diagnostics[0].kind,
            DiagnosticKind::AmbiguousReference
        );
    }
}

#[test]
fn shared_names_with_different_shapes_conflict() {
    let other = StructDef::new("Item").with_field(FieldDef::new("Weight", SourceType::Number));
    let graph = cart_graph(other);

    let err = Pipeline::new(&graph, RunConfig::new()).run().unwrap_err();
    assert!(matches!(
        err,
        RunError::DeclarationConflict { ref name, .. } if name == "Item"
    ));
}

#[test]
fn unknown_type_named_like_a_definition_references_it() {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("Invoice").with_field(FieldDef::new("Total", SourceType::unknown("Money"))),
    );
    graph.push(StructDef::new("Money").with_field(FieldDef::new("Cents", SourceType::Number)));

    let output = run(&graph, RunConfig::new());

    assert_eq!(names(&output.combined), vec!["Invoice", "Money"]);
    assert!(!output.combined[1].is_placeholder());
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(
        output.diagnostics[0].kind,
        DiagnosticKind::UnknownMatchesDefinition
    );
}

#[test]
fn strict_policies_abort_the_run() {
    let mut graph = TypeGraph::new();
    graph.push(StructDef::new("A").with_field(FieldDef::new("Amount", SourceType::named("Money"))));
    graph.push(StructDef::new("Grid").with_field(FieldDef::new(
        "Cells",
        SourceType::mapping(MapKey::Unsupported("Point".into()), SourceType::Bool),
    )));

    let config = RunConfig {
        unresolved_policy: UnresolvedPolicy::Strict,
        ..RunConfig::new().with_group(GroupConfig::new("a", ["A"]))
    };
    assert!(matches!(
        Pipeline::new(&graph, config).run().unwrap_err(),
        RunError::UnresolvedReference { .. }
    ));

    let config = RunConfig {
        map_key_policy: MapKeyPolicy::Strict,
        ..RunConfig::new().with_group(GroupConfig::new("grid", ["Grid"]))
    };
    assert!(matches!(
        Pipeline::new(&graph, config).run().unwrap_err(),
        RunError::UnsupportedMapKey { .. }
    ));
}

#[test]
fn first_failing_group_in_order_is_reported() {
    let mut graph = TypeGraph::new();
    graph.push(StructDef::new("A").with_field(FieldDef::new("X", SourceType::named("MissingA"))));
    graph.push(StructDef::new("B").with_field(FieldDef::new("Y", SourceType::named("MissingB"))));

    let config = RunConfig {
        unresolved_policy: UnresolvedPolicy::Strict,
        ..RunConfig::new()
            .with_group(GroupConfig::new("a", ["A"]))
            .with_group(GroupConfig::new("b", ["B"]))
    };
    for _ in 0..8 {
        let err = Pipeline::new(&graph, config.clone()).run().unwrap_err();
        assert_eq!(
            err,
            RunError::UnresolvedReference {
                group: "a".into(),
                owner: "A.X".into(),
                reference: "MissingA".into(),
            }
        );
    }
}

#[test]
fn unexported_items_can_be_excluded() {
    let mut graph = TypeGraph::new();
    graph.push(
        StructDef::new("Account")
            .with_field(FieldDef::new("ID", SourceType::Number).with_struct_tag(r#"json:"id""#))
            .with_field(FieldDef::new("secret", SourceType::Text).with_exported(false)),
    );

    let output = run(&graph, RunConfig::new());
    let account = interface(&output.combined, "Account");
    assert_eq!(account.fields.len(), 2);
    assert!(!field(account, "secret").exported);

    let config = RunConfig {
        include_unexported: false,
        ..RunConfig::new()
    };
    let output = run(&graph, config);
    assert_eq!(interface(&output.combined, "Account").fields.len(), 1);
}

#[test]
fn alias_definitions_are_emitted() {
    let mut graph = TypeGraph::new();
    graph.push(AliasDef::new("Status", SourceType::Text));
    graph.push(StructDef::new("Order").with_field(
        FieldDef::new("Status", SourceType::named("Status")).with_struct_tag(r#"json:"status""#),
    ));

    let config = RunConfig::new().with_group(GroupConfig::new("orders", ["Order"]));
    let output = run(&graph, config);
    assert_eq!(names(&output.combined), vec!["Order", "Status"]);
    assert!(matches!(
        output.combined[1].as_ref(),
        Declaration::Alias(alias) if alias.target == TypeExpr::string()
    ));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn invalid_configuration_is_rejected_before_running() {
    let graph = shop_graph();

    let config = shop_config().with_group(GroupConfig::new("requests", ["Customer"]));
    assert_eq!(
        Pipeline::new(&graph, config).run().unwrap_err(),
        RunError::Config(ConfigError::DuplicateGroup("requests".into()))
    );

    let config = shop_config().with_processing_order(["requests"]);
    assert_eq!(
        Pipeline::new(&graph, config).run().unwrap_err(),
        RunError::Config(ConfigError::MissingGroupInOrder("responses".into()))
    );

    let config = RunConfig::new().with_group(GroupConfig::new("x", ["Nope"]));
    assert_eq!(
        Pipeline::new(&graph, config).run().unwrap_err(),
        RunError::Config(ConfigError::UnknownRoot {
            group: "x".into(),
            root: "Nope".into(),
        })
    );
}
