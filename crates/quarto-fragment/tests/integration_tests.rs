/*
 * integration_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests for fragment insertion processors.
 */

use pretty_assertions::assert_eq;
use quarto_fragment::{
    ElementTag, FragmentError, FragmentInsertionProcessor, FragmentResult, FragmentValue,
    InsertionConfig, InsertionContent, InsertionMode, MarkupRenderer, MemoryFragmentResolver,
    Mutation, MutationRecorder, TemplateContext, TemplateData, TemplateEvent, TemplateMode,
    TemplateModel, TemplateRenderer, VariableContext,
};
use std::sync::Arc;

fn fragment_root(name: &str, signature: &str) -> TemplateEvent {
    TemplateEvent::OpenTag(ElementTag::new(name).with_attribute("th:fragment", signature))
}

/// An HTML page with a few fragments.
fn layout() -> TemplateModel {
    TemplateModel::new(
        TemplateData::new("layout", TemplateMode::Html),
        vec![
            TemplateEvent::DocumentStart,
            fragment_root("div", "card"),
            TemplateEvent::text("A"),
            TemplateEvent::open("span"),
            TemplateEvent::text("B"),
            TemplateEvent::close("span"),
            TemplateEvent::text("C"),
            TemplateEvent::close("div"),
            TemplateEvent::OpenTag(
                ElementTag::new("nav").with_attribute("data-th-fragment", "nav(active, level=1)"),
            ),
            TemplateEvent::text("[[${active}]]"),
            TemplateEvent::close("nav"),
            fragment_root("p", "quoted(label=&#39;none&#39;)"),
            TemplateEvent::close("p"),
            TemplateEvent::DocumentEnd,
        ],
    )
}

/// A plain-text template with a greeting block.
fn mail() -> TemplateModel {
    TemplateModel::new(
        TemplateData::new("mail", TemplateMode::Text),
        vec![
            fragment_root("block", "greeting(who)"),
            TemplateEvent::text("Dear [[${who}]],"),
            TemplateEvent::close("block"),
        ],
    )
}

fn resolver() -> Arc<MemoryFragmentResolver> {
    Arc::new(MemoryFragmentResolver::with_templates(
        "th",
        [layout(), mail()],
    ))
}

fn processor(mode: InsertionMode) -> FragmentInsertionProcessor {
    FragmentInsertionProcessor::new(
        mode,
        InsertionConfig::default(),
        resolver(),
        Arc::new(MarkupRenderer),
    )
}

fn run(
    mode: InsertionMode,
    host_mode: TemplateMode,
    directive: &str,
) -> (FragmentResult<()>, Vec<Mutation>) {
    let mut ctx = VariableContext::new(host_mode);
    let mut handler = MutationRecorder::new();
    let result = processor(mode).process(&mut ctx, directive, &mut handler);
    (result, handler.into_mutations())
}

fn inserted_model(mutations: &[Mutation]) -> &TemplateModel {
    match mutations.last() {
        Some(
            Mutation::ReplaceWith {
                content: InsertionContent::Model(model),
                processable: true,
            }
            | Mutation::SetBody {
                content: InsertionContent::Model(model),
                processable: true,
            },
        ) => model,
        other => panic!("expected a processable model insertion, got {:?}", other),
    }
}

fn local_variables(mutations: &[Mutation]) -> Vec<(String, FragmentValue)> {
    mutations
        .iter()
        .filter_map(|m| match m {
            Mutation::SetLocalVariable { name, value } => Some((name.clone(), value.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn test_replace_same_mode() {
    let (result, mutations) = run(InsertionMode::Replace, TemplateMode::Html, "layout :: card");
    result.unwrap();

    assert!(matches!(mutations.last(), Some(Mutation::ReplaceWith { .. })));
    insta::assert_snapshot!(
        inserted_model(&mutations).to_string(),
        @r#"<div th:fragment="card">A<span>B</span>C</div>"#
    );
}

#[test]
fn test_insert_keeps_envelope() {
    let (result, mutations) = run(InsertionMode::Insert, TemplateMode::Html, "~{layout :: card}");
    result.unwrap();

    assert!(matches!(mutations.last(), Some(Mutation::SetBody { .. })));
    assert_eq!(inserted_model(&mutations).len(), 7);
}

#[test]
fn test_include_strips_envelope() {
    let (result, mutations) = run(
        InsertionMode::IncludeContentsOnly,
        TemplateMode::Html,
        "layout :: card",
    );
    result.unwrap();

    assert!(matches!(mutations.last(), Some(Mutation::SetBody { .. })));
    insta::assert_snapshot!(inserted_model(&mutations).to_string(), @"A<span>B</span>C");
}

#[test]
fn test_include_whole_template_is_not_stripped() {
    let (result, mutations) = run(
        InsertionMode::IncludeContentsOnly,
        TemplateMode::Html,
        "~{layout}",
    );
    result.unwrap();

    assert_eq!(inserted_model(&mutations), &layout());
}

#[test]
fn test_template_data_applied_before_variables() {
    let (result, mutations) = run(
        InsertionMode::Insert,
        TemplateMode::Html,
        "layout :: nav(active='home')",
    );
    result.unwrap();

    assert_eq!(
        mutations[0],
        Mutation::SetTemplateData(TemplateData::new("layout", TemplateMode::Html).with_selector("nav"))
    );
    assert_eq!(
        local_variables(&mutations),
        vec![
            ("active".to_string(), FragmentValue::from("home")),
            ("level".to_string(), FragmentValue::Integer(1)),
        ]
    );
}

#[test]
fn test_positional_arguments_and_dropped_names() {
    let (result, mutations) = run(InsertionMode::Insert, TemplateMode::Html, "layout :: nav('docs', 3)");
    result.unwrap();
    assert_eq!(
        local_variables(&mutations),
        vec![
            ("active".to_string(), FragmentValue::from("docs")),
            ("level".to_string(), FragmentValue::Integer(3)),
        ]
    );

    let (result, mutations) = run(
        InsertionMode::Insert,
        TemplateMode::Html,
        "layout :: nav(active='x', extra=9)",
    );
    result.unwrap();
    assert_eq!(
        local_variables(&mutations),
        vec![
            ("active".to_string(), FragmentValue::from("x")),
            ("level".to_string(), FragmentValue::Integer(1)),
        ]
    );
}

#[test]
fn test_escaped_signature_default() {
    let (result, mutations) = run(InsertionMode::Replace, TemplateMode::Html, "layout :: quoted");
    result.unwrap();
    assert_eq!(
        local_variables(&mutations),
        vec![("label".to_string(), FragmentValue::from("none"))]
    );
}

#[test]
fn test_cross_mode_insert_renders_text() {
    let (result, mutations) = run(
        InsertionMode::Insert,
        TemplateMode::Html,
        "mail :: greeting(who='Ada')",
    );
    result.unwrap();

    assert_eq!(mutations.len(), 1);
    match &mutations[0] {
        Mutation::SetBody {
            content: InsertionContent::Text(text),
            processable: false,
        } => {
            insta::assert_snapshot!(text.as_str(), @r#"<block th:fragment="greeting(who)">Dear Ada,</block>"#);
        }
        other => panic!("expected non-processable text, got {:?}", other),
    }
}

fn rendered_text(handler: &MutationRecorder) -> &str {
    match handler.insertion() {
        Some(
            Mutation::ReplaceWith {
                content: InsertionContent::Text(text),
                processable: false,
            }
            | Mutation::SetBody {
                content: InsertionContent::Text(text),
                processable: false,
            },
        ) => text.as_str(),
        other => panic!("expected non-processable text, got {:?}", other),
    }
}

#[test]
fn test_cross_mode_locals_scoped_to_render() {
    let mut ctx = VariableContext::new(TemplateMode::Html);
    let mut handler = MutationRecorder::new();
    processor(InsertionMode::Replace)
        .process(&mut ctx, "mail :: greeting('Grace')", &mut handler)
        .unwrap();

    assert!(rendered_text(&handler).contains("Dear Grace,"));
    assert!(ctx.get("who").is_none());
    assert_eq!(ctx.insertion_depth(), 0);
}

#[test]
fn test_cross_mode_locals_do_not_leak_between_directives() {
    let mut ctx = VariableContext::new(TemplateMode::Html);
    ctx.insert("who", "reader");
    let insert = processor(InsertionMode::Insert);

    let mut first = MutationRecorder::new();
    insert
        .process(&mut ctx, "mail :: greeting(who='Ada')", &mut first)
        .unwrap();
    assert!(rendered_text(&first).contains("Dear Ada,"));
    assert_eq!(ctx.get("who"), Some(&FragmentValue::from("reader")));

    let mut second = MutationRecorder::new();
    insert.process(&mut ctx, "mail :: greeting", &mut second).unwrap();
    assert!(rendered_text(&second).contains("Dear reader,"));
}

#[test]
fn test_cross_mode_include_is_rejected() {
    let (result, mutations) = run(
        InsertionMode::IncludeContentsOnly,
        TemplateMode::Html,
        "mail :: greeting",
    );
    let err = result.unwrap_err();

    assert!(matches!(
        err,
        FragmentError::CrossModeDisallowed {
            host_mode: TemplateMode::Html,
            fragment_mode: TemplateMode::Text,
            ..
        }
    ));
    assert!(err.to_string().contains("th:include"));
    assert!(mutations.is_empty());
}

/// Context that cannot hold local variables.
struct ReadOnlyContext;

impl TemplateContext for ReadOnlyContext {
    fn template_mode(&self) -> TemplateMode {
        TemplateMode::Html
    }

    fn variable(&self, _name: &str) -> Option<&FragmentValue> {
        None
    }

    fn insertion_depth(&self) -> usize {
        0
    }

    fn set_insertion_depth(&mut self, _depth: usize) {}
}

#[test]
fn test_cross_mode_parameters_without_local_variables() {
    let mut handler = MutationRecorder::new();
    let err = processor(InsertionMode::Insert)
        .process(&mut ReadOnlyContext, "mail :: greeting(who='Ada')", &mut handler)
        .unwrap_err();

    assert!(matches!(
        err,
        FragmentError::MissingLocalVariableCapability { .. }
    ));
    assert!(err.to_string().contains("th:insert"));
    assert!(handler.mutations().is_empty());
}

#[test]
fn test_unresolvable_directives() {
    for directive in ["", "  ", "missing :: card", "layout :: nosuch", "~{layout :: card"] {
        let (result, mutations) = run(InsertionMode::Replace, TemplateMode::Html, directive);
        assert!(
            matches!(result, Err(FragmentError::UnparsableDirective { .. })),
            "directive {:?}",
            directive
        );
        assert!(mutations.is_empty());
    }
}

/// Renderer that re-enters insertion for a fragment in the other mode,
/// which in turn renders the first one again.
struct PingPongRenderer {
    resolver: Arc<MemoryFragmentResolver>,
    config: InsertionConfig,
}

impl TemplateRenderer for PingPongRenderer {
    fn render(
        &self,
        model: &TemplateModel,
        context: &mut dyn TemplateContext,
        sink: &mut String,
    ) -> FragmentResult<()> {
        let processor = FragmentInsertionProcessor::new(
            InsertionMode::Insert,
            self.config.clone(),
            self.resolver.clone(),
            Arc::new(PingPongRenderer {
                resolver: self.resolver.clone(),
                config: self.config.clone(),
            }),
        );
        let mut handler = MutationRecorder::new();
        // The context still reports the host's mode, so this is cross-mode again.
        processor.process(context, "mail :: greeting", &mut handler)?;
        sink.push_str(&model.to_string());
        Ok(())
    }
}

#[test]
fn test_self_referencing_fragment_hits_depth_limit() {
    let config = InsertionConfig::default().with_max_insertion_depth(3);
    let resolver = resolver();
    let processor = FragmentInsertionProcessor::new(
        InsertionMode::Insert,
        config.clone(),
        resolver.clone(),
        Arc::new(PingPongRenderer { resolver, config }),
    );

    let mut ctx = VariableContext::new(TemplateMode::Html);
    let mut handler = MutationRecorder::new();
    let err = processor
        .process(&mut ctx, "mail :: greeting", &mut handler)
        .unwrap_err();

    assert!(matches!(err, FragmentError::RecursionLimit { max_depth: 3, .. }));
    assert_eq!(ctx.insertion_depth(), 0);
    assert!(handler.mutations().is_empty());
}
