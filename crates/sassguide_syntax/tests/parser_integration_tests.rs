//! Integration tests for the SCSS parser.

use sassguide_syntax::{
    parse, parse_with_options, CommentKind, DeclarationClass, NodeKind, ParseOptions, SelectorKind,
    Visibility,
};

fn rule(kind: &NodeKind) -> &sassguide_syntax::RuleDeclaration {
    match kind {
        NodeKind::Rule(rule) => rule,
        other => panic!("expected rule, got {:?}", other),
    }
}

/// Test that brace and colon spacing is recorded on the tree.
#[test]
fn test_records_layout_of_compact_rule() {
    let sheet = parse(".avatar{border-radius:50%;border:2px solid white; }").unwrap();
    assert_eq!(sheet.nodes.len(), 1);

    let avatar = rule(&sheet.nodes[0].kind);
    assert_eq!(avatar.selectors.selectors[0].text, ".avatar");
    assert_eq!(avatar.block.layout.gap_before_open, "");
    assert!(!avatar.block.layout.close_on_own_line);

    let props: Vec<_> = avatar
        .block
        .nodes
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::Property(p) => Some(p),
            _ => None,
        })
        .collect();
    assert_eq!(props.len(), 2);
    assert_eq!(props[0].name, "border-radius");
    assert_eq!(props[0].value, "50%");
    assert_eq!(props[0].layout.gap_after_colon, "");
    assert_eq!(props[1].value, "2px solid white");
    assert_eq!(sheet.location(props[1].span.start).column, 27);
}

/// Test a canonical rule.
#[test]
fn test_canonical_rule_layout() {
    let sheet = parse(".avatar {\n  border-radius: 50%;\n}\n").unwrap();
    let avatar = rule(&sheet.nodes[0].kind);
    assert_eq!(avatar.block.layout.gap_before_open, " ");
    assert!(avatar.block.layout.close_on_own_line);
    match &avatar.block.nodes[0].kind {
        NodeKind::Property(p) => {
            assert_eq!(p.layout.gap_after_colon, " ");
            assert!(!p.layout.space_before_colon);
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Test that comments keep their style and position.
#[test]
fn test_comments_are_preserved() {
    let source = "// Header\n.a {\n  color: red; // why\n  /* note */\n}\n";
    let sheet = parse(source).unwrap();

    let header = sheet.nodes[0].as_comment().unwrap();
    assert_eq!(header.kind, CommentKind::Line);
    assert!(!header.trailing);

    let a = rule(&sheet.nodes[1].kind);
    let comments: Vec<_> = a.block.nodes.iter().filter_map(|n| n.as_comment()).collect();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "// why");
    assert!(comments[0].trailing);
    assert_eq!(comments[1].kind, CommentKind::Block);
    assert!(!comments[1].trailing);
}

/// Test that a same-line comment documents the variable before it.
#[test]
fn test_variable_comment_attachment() {
    let sheet = parse("$bitter-lemon: #dde80c; // Dark yellow\n$_gutter: 10px !default;\n").unwrap();
    assert_eq!(sheet.nodes.len(), 2);

    match &sheet.nodes[0].kind {
        NodeKind::Variable(v) => {
            assert_eq!(v.name, "bitter-lemon");
            assert_eq!(v.value, "#dde80c");
            assert_eq!(v.comment.as_ref().unwrap().text, "// Dark yellow");
            assert_eq!(v.visibility(), Visibility::Global);
        }
        other => panic!("unexpected {:?}", other),
    }
    match &sheet.nodes[1].kind {
        NodeKind::Variable(v) => {
            assert_eq!(v.value, "10px");
            assert_eq!(v.flags, vec!["!default".to_string()]);
            assert_eq!(v.visibility(), Visibility::FileLocal);
            assert!(v.comment.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Test blank line tracking between siblings.
#[test]
fn test_blank_lines_between_siblings() {
    let sheet = parse(".a {\n}\n.b {\n}\n\n.c {\n}\n").unwrap();
    let flags: Vec<bool> = sheet.nodes.iter().map(|n| n.blank_line_before).collect();
    assert_eq!(flags, vec![false, false, true]);
}

/// Test declarations, includes, extends and nested rules inside one block.
#[test]
fn test_block_item_classes() {
    let source = r#".btn {
  @extend %reset;
  color: red;
  @include transition(color .2s);
  @include hover {
    color: blue;
  }
  &:hover {
    color: green;
  }
  @media (min-width: 40em) {
    display: block;
  }
}
"#;
    let sheet = parse(source).unwrap();
    let btn = rule(&sheet.nodes[0].kind);
    let classes: Vec<_> = btn
        .block
        .nodes
        .iter()
        .filter_map(|n| n.declaration_class())
        .collect();
    assert_eq!(
        classes,
        vec![
            DeclarationClass::Leading,
            DeclarationClass::Property,
            DeclarationClass::Include,
            DeclarationClass::Include,
            DeclarationClass::Nested,
            DeclarationClass::Nested,
        ]
    );

    match &btn.block.nodes[2].kind {
        NodeKind::Include(inc) => {
            assert_eq!(inc.name, "transition");
            assert_eq!(inc.args.as_deref(), Some("color .2s"));
            assert!(inc.block.is_none());
        }
        other => panic!("unexpected {:?}", other),
    }
    match &btn.block.nodes[5].kind {
        NodeKind::AtRule(media) => {
            assert!(media.is_media());
            assert_eq!(media.prelude, "(min-width: 40em)");
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Test the walker's nesting depth and media tracking.
#[test]
fn test_walk_context() {
    let source = ".a { .b { .c { .d { color: red; } } } }\n@media print { .e { color: black; } }\n";
    let sheet = parse(source).unwrap();

    let mut depths = Vec::new();
    sheet.walk(&mut |node, ctx| {
        if let NodeKind::Rule(rule) = &node.kind {
            depths.push((rule.selectors.selectors[0].text.clone(), ctx.rule_depth, ctx.in_media));
        }
    });
    assert_eq!(
        depths,
        vec![
            (".a".to_string(), 0, false),
            (".b".to_string(), 1, false),
            (".c".to_string(), 2, false),
            (".d".to_string(), 3, false),
            (".e".to_string(), 0, true),
        ]
    );
}

/// Test selector groups keep their members and kinds.
#[test]
fn test_selector_groups() {
    let sheet = parse(".one,\n.two,\n#three {\n}\n").unwrap();
    let group = rule(&sheet.nodes[0].kind);
    let kinds: Vec<_> = group.selectors.selectors.iter().map(|s| s.kind()).collect();
    assert_eq!(kinds, vec![SelectorKind::Class, SelectorKind::Class, SelectorKind::Id]);
    assert_eq!(sheet.location(group.selectors.selectors[2].span.start).line, 3);
}

/// Test at-rules with and without blocks.
#[test]
fn test_generic_at_rules() {
    let source = "@use 'sass:math';\n@mixin center($w) {\n  margin: 0 auto;\n  width: $w;\n}\n@keyframes pulse {\n  from {\n    opacity: 0;\n  }\n\n  50% {\n    opacity: 1;\n  }\n}\n";
    let sheet = parse(source).unwrap();
    let names: Vec<_> = sheet
        .nodes
        .iter()
        .filter_map(|n| match &n.kind {
            NodeKind::AtRule(a) => Some((a.name.clone(), a.prelude.clone(), a.block.is_some())),
            _ => None,
        })
        .collect();
    assert_eq!(
        names,
        vec![
            ("use".to_string(), "'sass:math'".to_string(), false),
            ("mixin".to_string(), "center($w)".to_string(), true),
            ("keyframes".to_string(), "pulse".to_string(), true),
        ]
    );
}

/// Test error positions for malformed input.
#[test]
fn test_parse_errors() {
    let err = parse(".a {\n  color: red;\n").unwrap_err();
    assert_eq!((err.line, err.column), (1, 4));
    assert!(err.reason.contains("unclosed block"));

    let err = parse(".a {\n}\n}\n").unwrap_err();
    assert_eq!((err.line, err.column), (3, 1));

    let err = parse(".a, , .b {\n}\n").unwrap_err();
    assert!(err.reason.starts_with("invalid selector"));

    let err = parse(".a {\n  color red;\n}\n").unwrap_err();
    assert_eq!(err.line, 2);
    assert!(err.reason.contains("expected ':'"));
}

/// Test the nesting guard.
#[test]
fn test_max_depth_guard() {
    let source = ".a { .b { .c { color: red; } } }";
    let options = ParseOptions {
        max_depth: 2,
        ..Default::default()
    };
    let err = parse_with_options(source, options).unwrap_err();
    assert!(err.reason.contains("maximum depth of 2"));
    assert!(parse(source).is_ok());
}

/// Test the size guard.
#[test]
fn test_max_len_guard() {
    let options = ParseOptions {
        max_len: 4,
        ..Default::default()
    };
    assert!(parse_with_options(".a { }", options).is_err());
}
