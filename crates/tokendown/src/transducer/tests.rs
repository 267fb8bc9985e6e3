use super::*;
use pretty_assertions::assert_eq;
#[cfg(feature = "html")]
use rstest::rstest;
use tokendown_core::{Attributes, Tag, TokenNode};

fn start(name: &str) -> HtmlToken {
    HtmlToken::start_tag(name, Attributes::new())
}

fn end(name: &str) -> HtmlToken {
    HtmlToken::end_tag(name)
}

fn text(data: &str) -> HtmlToken {
    HtmlToken::characters(data)
}

fn anchor(href: &str) -> HtmlToken {
    start("a").with_attr("href", href)
}

fn run_with(tokens: Vec<HtmlToken>, options: &Options) -> Vec<Token> {
    transduce(&tokens, options).expect("transduce failed")
}

fn run(tokens: Vec<HtmlToken>) -> Vec<Token> {
    run_with(tokens, &Options::default())
}

fn labels(tokens: &[Token]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| match &token.node {
            TokenNode::Markdown { tag, data } if data.is_empty() => format!("{tag:?}"),
            TokenNode::Markdown { tag, data } => format!("{tag:?}({data:?})"),
            TokenNode::Native { edge, raw } => {
                format!("{edge:?}Native({})", raw.name().unwrap_or_default())
            }
            TokenNode::Html(raw) => match raw.kind {
                HtmlTokenKind::StartTag => format!("<{}>", raw.name().unwrap_or_default()),
                HtmlTokenKind::EndTag => format!("</{}>", raw.name().unwrap_or_default()),
                HtmlTokenKind::EmptyTag => format!("<{}/>", raw.name().unwrap_or_default()),
                _ => format!("{:?}", raw.text()),
            },
        })
        .collect()
}

#[test]
fn test_paragraph() {
    let tokens = run(vec![start("p"), text("Hello"), end("p")]);
    assert_eq!(labels(&tokens), vec!["StartBlock", "\"Hello\"", "EndBlock"]);
}

#[test]
fn test_strong_uses_configured_char() {
    let tokens = run(vec![
        start("p"),
        text("Hello"),
        HtmlToken::space_characters(" "),
        start("b"),
        text("World"),
        end("b"),
        end("p"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "\"Hello\"",
            "Space(\" \")",
            "Strong(\"**\")",
            "\"World\"",
            "Strong(\"**\")",
            "EndBlock",
        ]
    );

    let options = Options {
        strong_char: '_',
        ..Options::default()
    };
    let tokens = run_with(vec![start("strong"), text("x"), end("strong")], &options);
    assert_eq!(labels(&tokens), vec!["Strong(\"__\")", "\"x\"", "Strong(\"__\")"]);
}

#[test]
fn test_bold_italic_fusion() {
    let tokens = run(vec![start("b"), start("i"), text("x"), end("i"), end("b")]);
    assert_eq!(
        labels(&tokens),
        vec!["BoldItalic(\"***\")", "\"x\"", "BoldItalic(\"***\")"]
    );

    let tokens = run(vec![start("em"), start("strong"), text("x"), end("strong"), end("em")]);
    assert_eq!(
        labels(&tokens),
        vec!["BoldItalic(\"***\")", "\"x\"", "BoldItalic(\"***\")"]
    );
}

#[test]
fn test_no_fusion_with_trailing_content() {
    let tokens = run(vec![
        start("b"),
        start("i"),
        text("x"),
        end("i"),
        text("y"),
        end("b"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "Strong(\"**\")",
            "Emphasis(\"_\")",
            "\"x\"",
            "Emphasis(\"_\")",
            "\"y\"",
            "Strong(\"**\")",
        ]
    );
}

#[test]
fn test_empty_pairs_are_removed() {
    let tokens = run(vec![start("b"), start("i"), end("i"), text("x"), end("b")]);
    assert_eq!(labels(&tokens), vec!["Strong(\"**\")", "\"x\"", "Strong(\"**\")"]);

    let tokens = run(vec![start("p"), end("p"), text("x")]);
    assert_eq!(labels(&tokens), vec!["\"x\""]);
}

#[test]
fn test_nested_lists() {
    let tokens = run(vec![
        start("ul"),
        start("li"),
        text("a"),
        start("ul"),
        start("li"),
        text("b"),
        end("li"),
        end("ul"),
        end("li"),
        end("ul"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "ListItemStart(\"\\n* \")",
            "\"a\"",
            "ListItemStart(\"\\n  * \")",
            "\"b\"",
            "EndBlock",
        ]
    );
}

#[test]
fn test_ordered_list_numbers_items() {
    let tokens = run(vec![
        start("ol"),
        start("li"),
        text("a"),
        end("li"),
        start("li"),
        text("b"),
        end("li"),
        end("ol"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "ListItemStart(\"\\n1. \")",
            "\"a\"",
            "ListItemStart(\"\\n2. \")",
            "\"b\"",
            "EndBlock",
        ]
    );
}

#[test]
fn test_adjacent_lists_share_one_block() {
    let tokens = run(vec![
        start("ul"),
        start("li"),
        text("a"),
        end("li"),
        end("ul"),
        HtmlToken::space_characters("\n"),
        start("ul"),
        start("li"),
        text("b"),
        end("li"),
        end("ul"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "ListItemStart(\"\\n* \")",
            "\"a\"",
            "ListItemStart(\"\\n* \")",
            "\"b\"",
            "EndBlock",
        ]
    );
}

#[test]
fn test_blockquote_depth_stamping() {
    let tokens = run(vec![
        start("blockquote"),
        start("p"),
        text("x"),
        end("p"),
        end("blockquote"),
    ]);
    let depths: Vec<Option<usize>> = tokens.iter().map(|t| t.blockquote_depth).collect();
    assert_eq!(
        depths,
        vec![Some(1), Some(1), Some(1), Some(1), Some(1), None, None]
    );
    assert_eq!(tokens[5].tag(), Some(Tag::EndBlockquote));
}

#[test]
fn test_flat_anchor_becomes_link() {
    let tokens = run(vec![anchor("http://x.com"), text("X"), end("a")]);
    assert_eq!(labels(&tokens), vec!["AnchorInline(\"[X](http://x.com)\")"]);

    let titled = anchor("http://x.com").with_attr("title", "Home");
    let tokens = run(vec![titled, text("X"), end("a")]);
    assert_eq!(
        labels(&tokens),
        vec!["AnchorInline(\"[X](http://x.com \\\"Home\\\")\")"]
    );
}

#[test]
fn test_self_link_is_simplified() {
    let tokens = run(vec![anchor("http://google.com"), text("http://google.com"), end("a")]);
    assert_eq!(labels(&tokens), vec!["AnchorSimple(\"<http://google.com>\")"]);

    let options = Options {
        simplify_self_links: false,
        ..Options::default()
    };
    let tokens = run_with(
        vec![anchor("http://google.com"), text("http://google.com"), end("a")],
        &options,
    );
    assert_eq!(
        labels(&tokens),
        vec!["AnchorInline(\"[http://google.com](http://google.com)\")"]
    );
}

#[test]
fn test_nested_anchor_content_passes_as_tag() {
    let tokens = run(vec![
        anchor("http://x.com").with_attr("onclick", "x()"),
        start("b"),
        text("x"),
        end("b"),
        end("a"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec!["<a>", "Strong(\"**\")", "\"x\"", "Strong(\"**\")", "</a>"]
    );
    let raw = tokens[0].raw().expect("raw anchor");
    assert_eq!(raw.attr("href"), Some("http://x.com"));
    assert_eq!(raw.attr("onclick"), None);
}

#[test]
fn test_anchor_without_href_keeps_text() {
    let tokens = run(vec![start("a"), text("x"), end("a")]);
    assert_eq!(labels(&tokens), vec!["\"x\""]);
}

#[test]
fn test_reference_style_links() {
    let options = Options {
        reference_style_links: true,
        ..Options::default()
    };
    let tokens = run_with(
        vec![
            start("p"),
            anchor("http://x.com"),
            text("X"),
            end("a"),
            HtmlToken::space_characters(" "),
            anchor("http://x.com"),
            text("again"),
            end("a"),
            end("p"),
        ],
        &options,
    );
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "AnchorInline(\"[X][1]\")",
            "Space(\" \")",
            "AnchorInline(\"[again][1]\")",
            "EndBlock",
            "NewlineBlank(\"\\n\\n\")",
            "StartBlock",
            "Newline(\"\\n\")",
            "AnchorReference(\"[1]: http://x.com\")",
            "EndBlock",
        ]
    );
}

#[test]
fn test_images() {
    let img = HtmlToken::empty_tag("img", Attributes::new())
        .with_attr("src", "a.png")
        .with_attr("alt", "A");
    assert_eq!(labels(&run(vec![img.clone()])), vec!["Image(\"![A](a.png)\")"]);

    let bare = HtmlToken::empty_tag("img", Attributes::new()).with_attr("src", "a.png");
    assert_eq!(labels(&run(vec![bare])), vec!["Image(\"![Image](a.png)\")"]);

    let missing = HtmlToken::empty_tag("img", Attributes::new()).with_attr("alt", "A");
    assert!(run(vec![missing]).is_empty());

    let options = Options {
        reference_style_images: true,
        ..Options::default()
    };
    let tokens = run_with(vec![img], &options);
    assert_eq!(labels(&tokens)[0], "Image(\"![A][1]\")");
    assert_eq!(
        labels(&tokens).last().map(String::as_str),
        Some("EndBlock")
    );
}

#[test]
fn test_line_breaks() {
    let br = || HtmlToken::empty_tag("br", Attributes::new());
    let tokens = run(vec![text("a"), br(), br(), text("b")]);
    assert_eq!(
        labels(&tokens),
        vec!["\"a\"", "NewlineHard(\"  \\n\")", "\"b\""]
    );

    let tokens = run(vec![start("ul"), start("li"), text("a"), br(), end("li"), end("ul")]);
    assert!(!labels(&tokens).iter().any(|l| l.starts_with("NewlineHard")));
}

#[test]
fn test_horizontal_rule() {
    let tokens = run(vec![HtmlToken::empty_tag("hr", Attributes::new())]);
    assert_eq!(
        labels(&tokens),
        vec!["StartBlock", "HorizontalRule(\"---\")", "EndBlock"]
    );
}

#[test]
fn test_pre_with_code_child() {
    let tokens = run(vec![start("pre"), start("code"), text("x = 1"), end("code"), end("pre")]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "StartNative(pre)",
            "StartCode",
            "\"x = 1\"",
            "EndCode",
            "EndNative(pre)",
            "EndBlock",
        ]
    );
}

#[test]
fn test_bare_pre_behaviors() {
    let tokens = run(vec![start("pre"), text("x"), end("pre")]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "StartNative(pre)",
            "StartCode",
            "\"x\"",
            "EndCode",
            "EndNative(pre)",
            "EndBlock",
        ]
    );

    let options = Options {
        pre_behavior: PreBehavior::Paragraph,
        ..Options::default()
    };
    let tokens = run_with(vec![start("pre"), text("x"), end("pre")], &options);
    assert_eq!(labels(&tokens), vec!["StartBlock", "\"x\"", "EndBlock"]);
}

#[test]
fn test_sensitive_content_is_raw() {
    let tokens = run(vec![
        start("code"),
        start("b"),
        text("x  y"),
        end("b"),
        end("code"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec!["StartCode", "<b>", "\"x  y\"", "</b>", "EndCode"]
    );
}

#[test]
fn test_scripts() {
    let tokens = run(vec![start("script"), text("alert(1)"), end("script"), text("x")]);
    assert_eq!(labels(&tokens), vec!["\"x\""]);

    let options = Options {
        strip_scripts: false,
        ..Options::default()
    };
    let tokens = run_with(
        vec![start("script"), text("alert(1)"), end("script"), text("x")],
        &options,
    );
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "StartNative(script)",
            "\"alert(1)\"",
            "EndNative(script)",
            "EndBlock",
            "\"x\"",
        ]
    );
}

#[test]
fn test_bare_autolinks() {
    let link = || start("https:").with_attr("example.com", "");
    let tokens = run(vec![link(), end("https:")]);
    assert_eq!(labels(&tokens), vec!["AnchorSimple(\"<https://example.com>\")"]);

    let options = Options {
        simplify_self_links: false,
        ..Options::default()
    };
    let tokens = run_with(vec![link(), end("https:")], &options);
    assert_eq!(
        labels(&tokens),
        vec!["AnchorInline(\"[https://example.com](https://example.com)\")"]
    );

    let options = Options {
        parse_bare_autolinks: false,
        ..Options::default()
    };
    assert!(run_with(vec![link(), end("https:")], &options).is_empty());
}

#[test]
fn test_mailto_autolink() {
    let tokens = run(vec![start("mailto:a@b.com"), end("mailto:a@b.com")]);
    assert_eq!(labels(&tokens), vec!["AnchorSimple(\"<mailto:a@b.com>\")"]);

    let options = Options {
        simplify_self_links: false,
        ..Options::default()
    };
    let tokens = run_with(vec![start("mailto:a@b.com"), end("mailto:a@b.com")], &options);
    assert_eq!(
        labels(&tokens),
        vec!["AnchorInline(\"[a@b.com](mailto:a@b.com)\")"]
    );
}

#[test]
fn test_passthrough_tags() {
    let tokens = run(vec![
        start("table").with_attr("class", "wide"),
        start("tr"),
        start("td"),
        text("x"),
        end("td"),
        end("tr"),
        end("table"),
    ]);
    assert_eq!(
        labels(&tokens),
        vec![
            "StartBlock",
            "<table>",
            "<tr>",
            "<td>",
            "\"x\"",
            "</td>",
            "</tr>",
            "</table>",
            "EndBlock",
        ]
    );
    assert!(tokens[1].raw().is_some_and(|raw| raw.attributes.is_empty()));

    let tokens = run(vec![start("span"), text("x"), end("span")]);
    assert_eq!(labels(&tokens), vec!["\"x\""]);
}

#[test]
fn test_fragment_wrapper_is_dropped() {
    let wrapper = start(FRAGMENT_TAG).with_attr("id", crate::utilities::FRAGMENT_ID);
    let tokens = run(vec![wrapper, text("x"), end(FRAGMENT_TAG)]);
    assert_eq!(labels(&tokens), vec!["\"x\""]);
}

#[test]
fn test_core_tag_in_fallback_is_internal_error() {
    let tokens = vec![start("hr"), text("x")];
    assert!(matches!(
        transduce(&tokens, &Options::default()),
        Err(TransformError::Internal(_))
    ));
}

#[test]
fn test_unbalanced_close_is_internal_error() {
    let tokens = vec![text("x"), end("blockquote")];
    assert!(matches!(
        transduce(&tokens, &Options::default()),
        Err(TransformError::Internal(_))
    ));
}

#[test]
fn test_comments_and_doctype() {
    let tokens = run(vec![
        HtmlToken::doctype("html"),
        HtmlToken::comment(" note "),
        text("x"),
    ]);
    assert_eq!(labels(&tokens), vec!["\" note \"", "\"x\""]);

    let options = Options {
        strip_comments: true,
        ..Options::default()
    };
    let tokens = run_with(vec![HtmlToken::comment(" note "), text("x")], &options);
    assert_eq!(labels(&tokens), vec!["\"x\""]);
}

#[test]
fn test_multiline_text_is_split() {
    let tokens = run(vec![text("a\n  b")]);
    assert_eq!(
        labels(&tokens),
        vec![
            "CharactersSplit(\"a\")",
            "Newline(\"\\n\")",
            "CharactersSplit(\"b\")",
        ]
    );

    let tokens = run(vec![start("p"), text("a\n  b"), end("p")]);
    assert_eq!(labels(&tokens), vec!["StartBlock", "\"a b\"", "EndBlock"]);
}

#[cfg(feature = "html")]
#[rstest]
#[case::nested_lists("<ul><li>a<ul><li>b<ol><li>c</li></ol></li></ul></li><li>d</li></ul>")]
#[case::adjacent_lists("<ul><li>a</li></ul>\n<ol><li>b</li></ol><ul><li>c</li></ul>")]
#[case::quoted_code("<blockquote><pre><code>x = 1\ny</code></pre></blockquote>")]
#[case::nested_quotes("<blockquote>a<blockquote><p>b</p></blockquote>c</blockquote><p>d</p>")]
#[case::rules("<p>a</p><hr><blockquote><hr></blockquote><p>b</p>")]
#[case::bare_pre("<pre>a\n  b</pre><p>c</p>")]
#[case::headings_and_divs("<div><h2>T</h2><div><p>x</p></div></div>")]
#[case::passthrough_table("<table><tr><td><p>x</p></td></tr></table><p>y</p>")]
#[case::references(
    r#"<p><a href="http://a.com">A</a> <img src="b.png"> <a href="http://a.com">C</a></p>"#
)]
#[case::scripts_and_comments("<p>a<!-- c --></p><script>if (a < b) {}</script><p>b</p>")]
fn test_block_markers_balance(#[case] html: &str) {
    let options = Options {
        reference_style_links: true,
        reference_style_images: true,
        ..Options::default()
    };
    let tokens = crate::html::tokenize_fragment(html);
    let mut transducer = Transducer::new(&tokens, &options);
    transducer.consume().expect("transduce failed");
    assert!(
        transducer.context.unbalanced().is_empty(),
        "unbalanced: {:?}",
        transducer.context.unbalanced()
    );

    let output = transducer.finish();
    let count = |tag: Tag| output.iter().filter(|token| token.has_tag(tag)).count();
    assert_eq!(count(Tag::StartBlock), count(Tag::EndBlock));
    assert_eq!(count(Tag::StartBlockquote), count(Tag::EndBlockquote));
    assert_eq!(count(Tag::StartCode), count(Tag::EndCode));
    assert!(output.last().is_some_and(|token| token.blockquote_depth.is_none()));
}
