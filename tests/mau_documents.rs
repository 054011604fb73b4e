//! Whole-document tests
//!
//! Each test compiles a complete source through the public entry points and checks the
//! resulting tree with assert_ast:
//! - one feature per test, nested content where the feature crosses block boundaries
//! - cross references checked after resolution, numbers and copied content included
//! - fatal errors checked by message, never by variant alone

use mau::mau::ast::{NodeKind, CONTENT};
use mau::mau::testing::{assert_ast, compile_str, compile_with_files, try_compile, TextMatch};
use mau::mau::{Environment, MauError};

fn toc_entry(level: usize, expected: &'static str) -> impl Fn(&NodeKind) -> bool {
    move |kind: &NodeKind| {
        matches!(kind, NodeKind::TocEntry { level: l, value, .. } if *l == level && value == expected)
    }
}

fn compile_error(source: &str) -> MauError {
    match try_compile(source, Environment::new(), &[]) {
        Ok(_) => panic!("Expected {:?} to fail", source),
        Err(err) => err,
    }
}

#[test]
fn test_nested_list_scenario() {
    let compilation = compile_str("* Item 1\n** Item 1.1\n* Item 2\n");

    assert_ast(&compilation).item_count(1).item(0, |list| {
        list.kind(NodeKind::List {
            ordered: false,
            main_node: true,
            start: None,
        })
        .child_count(CONTENT, 2)
        .content(0, |item| {
            item.kind(NodeKind::ListItem { level: 1 })
                .child_count(CONTENT, 2)
                .content(0, |sentence| {
                    sentence.tag("sentence").text("Item 1");
                })
                .content(1, |sublist| {
                    sublist
                        .kind(NodeKind::List {
                            ordered: false,
                            main_node: false,
                            start: None,
                        })
                        .children(CONTENT, |items| {
                            items.count(1).texts(&["Item 1.1"]);
                        });
                });
        })
        .content(1, |item| {
            item.text("Item 2");
        });
    });
}

#[test]
fn test_ordered_list_with_start() {
    let compilation = compile_str("[start=4]\n# four\n# five");

    assert_ast(&compilation).item(0, |list| {
        list.kind(NodeKind::List {
            ordered: true,
            main_node: true,
            start: Some(4),
        })
        .kwarg("start", "4");
    });
}

#[test]
fn test_source_callout_scenario() {
    let compilation = compile_str("[source,py]\n----\nx = 1:1:\n----\n1: assignment\n");

    assert_ast(&compilation).item_count(1).item(0, |source| {
        source
            .kind(NodeKind::Source {
                language: "py".to_string(),
                highlights: vec![],
            })
            .children("code", |code| {
                code.texts(&["x = 1"]);
            })
            .child("markers", 0, |marker| {
                marker.kind(NodeKind::Callout {
                    line: 0,
                    name: "1".to_string(),
                });
            })
            .child_count("callouts", 1)
            .child("callouts", 0, |entry| {
                entry.kind(NodeKind::CalloutEntry {
                    marker: "1".to_string(),
                    value: "assignment".to_string(),
                });
            });
    });
}

#[test]
fn test_source_highlights_and_custom_delimiter() {
    let compilation =
        compile_str("[source, rust, callouts=|]\n----\nlet a = 1;|@|\nlet b = a;|note|\n----");

    assert_ast(&compilation).item(0, |source| {
        source
            .kind(NodeKind::Source {
                language: "rust".to_string(),
                highlights: vec![0],
            })
            .children("code", |code| {
                code.texts(&["let a = 1;", "let b = a;"]);
            })
            .child("markers", 0, |marker| {
                marker.kind(NodeKind::Callout {
                    line: 1,
                    name: "note".to_string(),
                });
            });
    });
}

#[test]
fn test_callout_description_for_unknown_marker_is_fatal() {
    let err = compile_error("[source]\n----\nx = 1:1:\n----\n2: nothing here\n");
    assert!(err.to_string().contains("Callout '2' is not used in the source"));
}

#[test]
fn test_footnotes_number_in_mention_order() {
    let source = "\
[footnote, second]
----
Defined first
----

One[footnote](first) and two[footnote](second).

[footnote, first]
----
Defined last
----

::footnotes:
";
    let compilation = compile_str(source);

    assert_ast(&compilation)
        .item_tags(&["paragraph", "footnotes"])
        .footnotes(|footnotes| {
            footnotes
                .count(2)
                .item(0, |entry| {
                    entry
                        .kind_matches("footnote entry 1 named first", |kind| {
                            matches!(kind, NodeKind::FootnoteEntry { number: 1, name, .. } if name == "first")
                        })
                        .text("Defined last");
                })
                .item(1, |entry| {
                    entry
                        .kind_matches("footnote entry 2 named second", |kind| {
                            matches!(kind, NodeKind::FootnoteEntry { number: 2, name, .. } if name == "second")
                        })
                        .text("Defined first");
                });
        })
        .item(0, |paragraph| {
            paragraph.content(0, |sentence| {
                sentence.content(1, |mention| {
                    mention
                        .kind_matches("a resolved footnote", |kind| {
                            matches!(kind, NodeKind::Footnote { number: Some(1), reference_anchor: Some(anchor), .. } if anchor.starts_with("ref-footnote-1-"))
                        })
                        .text("Defined last");
                });
            });
        })
        .item(1, |listing| {
            listing.children("entries", |entries| {
                entries.count(2).texts(&["Defined last", "Defined first"]);
            });
        });
}

#[test]
fn test_footnote_mentioned_twice_is_fatal() {
    let err = compile_error(
        "A[footnote](note) B[footnote](note)\n\n[footnote, note]\n----\nText\n----",
    );
    assert!(err.to_string().contains("note"));
    assert!(matches!(err, MauError::Parser { .. }));
}

#[test]
fn test_undefined_footnote_is_fatal() {
    let err = compile_error("A[footnote](ghost)");
    assert!(err.to_string().contains("Footnote 'ghost' has not been defined"));
}

#[test]
fn test_footnotes_listing_excludes_tags() {
    let source = "\
A[footnote](a) B[footnote](b)

[footnote, a, #private]
----
Hidden
----

[footnote, b]
----
Shown
----

::footnotes:exclude_tag=private
";
    let compilation = compile_str(source);

    assert_ast(&compilation)
        .footnotes(|footnotes| {
            footnotes.count(2);
        })
        .item(1, |listing| {
            listing.children("entries", |entries| {
                entries.texts(&["Shown"]);
            });
        });
}

#[test]
fn test_references_number_per_content_type() {
    let source = "\
[reference](fig, b) [reference](table, t) [reference](fig, a)

[reference, fig, a]
----
Figure A
----

[reference, fig, b]
----
Figure B
----

[reference, table, t]
----
Table T
----

::references:fig
";
    let compilation = compile_str(source);

    let numbered = |content_type: &'static str, name: &'static str, number: usize| {
        move |kind: &NodeKind| {
            matches!(kind, NodeKind::ReferenceEntry { content_type: t, name: n, number: k, .. }
                if t == content_type && n == name && *k == number)
        }
    };

    assert_ast(&compilation)
        .references(|references| {
            references
                .count(3)
                .item(0, |entry| {
                    entry.kind_matches("fig:b number 1", numbered("fig", "b", 1));
                })
                .item(1, |entry| {
                    entry.kind_matches("table:t number 1", numbered("table", "t", 1));
                })
                .item(2, |entry| {
                    entry.kind_matches("fig:a number 2", numbered("fig", "a", 2));
                });
        })
        .item(1, |listing| {
            listing.children("entries", |entries| {
                entries.texts(&["Figure B", "Figure A"]);
            });
        });
}

#[test]
fn test_toc_folds_headers_across_blocks() {
    let source = "\
= A

== A.1

----
== A.2
----

= B

== B.1

=== B.1.1

::toc:
";
    let compilation = compile_str(source);

    assert_ast(&compilation)
        .toc(|toc| {
            toc.count(2)
                .item(0, |a| {
                    a.kind_matches("entry A", toc_entry(1, "A"))
                        .child_count(CONTENT, 2)
                        .content(0, |a1| {
                            a1.kind_matches("entry A.1", toc_entry(2, "A.1"));
                        })
                        .content(1, |a2| {
                            a2.kind_matches("entry A.2", toc_entry(2, "A.2"));
                        });
                })
                .item(1, |b| {
                    b.kind_matches("entry B", toc_entry(1, "B"))
                        .child_count(CONTENT, 1)
                        .content(0, |b1| {
                            b1.kind_matches("entry B.1", toc_entry(2, "B.1"))
                                .content(0, |b11| {
                                    b11.kind_matches("entry B.1.1", toc_entry(3, "B.1.1"));
                                });
                        });
                });
        })
        .item(6, |listing| {
            listing.tag("toc").child_count("entries", 2);
        });
}

#[test]
fn test_header_macro_links_to_header_id() {
    let compilation = compile_str("[id=intro]\n= Introduction\n\nSee [header](intro, \"the intro\").");

    assert_ast(&compilation).item(1, |paragraph| {
        paragraph.content(0, |sentence| {
            sentence.content(1, |link| {
                link.kind_matches("a resolved header link", |kind| {
                    matches!(kind, NodeKind::MacroHeader { header_id, header_anchor: Some(anchor) }
                        if header_id == "intro" && anchor.starts_with("introduction-"))
                })
                .text("the intro");
            });
        });
    });
}

#[test]
fn test_header_macro_with_unknown_id_is_fatal() {
    let err = compile_error("= Title\n\n[header](nowhere)");
    assert!(err.to_string().contains("Header id 'nowhere' has not been defined"));
}

#[test]
fn test_includes_and_mau_content() {
    let compilation = compile_with_files(
        "::#include:intro.mau\n\n<< mau:chapter.mau\n",
        &[
            ("intro.mau", "= Intro\n\nWelcome"),
            ("chapter.mau", "== Chapter\n\nText[footnote](note)\n\n[footnote, note]\n----\nA note\n----"),
        ],
    );

    assert_ast(&compilation)
        .item_tags(&["header", "paragraph", "content"])
        .item(2, |content| {
            content
                .kind(NodeKind::Content {
                    content_type: "mau".to_string(),
                    uris: vec!["chapter.mau".to_string()],
                })
                .children(CONTENT, |children| {
                    children.tags(&["header", "paragraph"]);
                });
        })
        .toc(|toc| {
            toc.count(1).item(0, |intro| {
                intro.child_count(CONTENT, 1);
            });
        })
        .footnotes(|footnotes| {
            footnotes.count(1);
        });
}

#[test]
fn test_missing_include_is_fatal() {
    let err = compile_error("::#include:missing.mau");
    assert!(err.to_string().contains("missing.mau"));
}

#[test]
fn test_mau_engine_keeps_its_collections() {
    let source = "\
:name:outer

[engine=mau]
++++
= Local

Inner[footnote](n)

[footnote, n]
----
Inner note
----
++++

= Global
";
    let compilation = compile_str(source);

    assert_ast(&compilation)
        .toc(|toc| {
            toc.count(1).item(0, |entry| {
                entry.kind_matches("entry Global", toc_entry(1, "Global"));
            });
        })
        .footnotes(|footnotes| {
            footnotes.count(0);
        })
        .item(0, |block| {
            block
                .kind(NodeKind::Block {
                    blocktype: None,
                    engine: "mau".to_string(),
                })
                .child("primary", 1, |paragraph| {
                    paragraph.text("InnerInner note");
                });
        });
}

#[test]
fn test_mau_engine_sees_mau_configuration_only() {
    let mut environment = Environment::new();
    environment.set("mau.parser.block_definitions.note.blocktype", "admonition");
    environment.set("site.name", "docs");

    let compilation = try_compile(
        "[engine=mau]\n++++\n[note]\n----\nInside\n----\n++++",
        environment.clone(),
        &[],
    )
    .unwrap();
    assert_ast(&compilation).item(0, |block| {
        block.child("primary", 0, |inner| {
            inner.kind(NodeKind::Block {
                blocktype: Some("admonition".to_string()),
                engine: "default".to_string(),
            });
        });
    });

    let err = try_compile("[engine=mau]\n----\n{site.name}\n----", environment, &[]).unwrap_err();
    assert!(err.to_string().contains("site.name"));
}

#[test]
fn test_block_aliases_and_titles() {
    let source = "\
::defblock:aside, admonition, class, icon, label=Note

.Careful
[aside, warning, fire]
----
Hot *stuff*
----
";
    let compilation = compile_str(source);

    assert_ast(&compilation).item_count(1).item(0, |block| {
        block
            .kind(NodeKind::Block {
                blocktype: Some("admonition".to_string()),
                engine: "default".to_string(),
            })
            .kwarg("class", "warning")
            .kwarg("icon", "fire")
            .kwarg("label", "Note")
            .child("title", 0, |title| {
                title.text("Careful");
            })
            .child("primary", 0, |paragraph| {
                paragraph.text("Hot stuff");
            });
    });
}

#[test]
fn test_control_discards_false_branches() {
    let source = "\
:+draft:

@if:draft==true
Draft only

@if:draft!=true
Final only

@if:draft==true
:status:wip

Status {status}
";
    let compilation = compile_str(source);

    assert_ast(&compilation)
        .item_count(2)
        .item(0, |paragraph| {
            paragraph.text("Draft only");
        })
        .item(1, |paragraph| {
            paragraph.text("Status wip");
        });
}

#[test]
fn test_variables_and_escapes() {
    let compilation = compile_str(":who:world\n\nHello {who}, not \\{who\\} and `{who}`");

    assert_ast(&compilation).item(0, |paragraph| {
        paragraph
            .text(TextMatch::StartsWith("Hello world, not {who} and ".to_string()))
            .content(0, |sentence| {
                sentence.children(CONTENT, |children| {
                    children.tags(&["text", "verbatim"]).texts(&[
                        "Hello world, not {who} and ",
                        "{who}",
                    ]);
                });
            });
    });
}

#[test]
fn test_undefined_variable_is_fatal() {
    let err = compile_error("Hello {nobody}");
    assert!(err.to_string().contains("Variable 'nobody' has not been defined"));
}

#[test]
fn test_unwrapped_document() {
    let mut environment = Environment::new();
    environment.set("mau.parser.wrap_document", false);
    let compilation = try_compile("Hello", environment, &[]).unwrap();

    assert_ast(&compilation)
        .root(NodeKind::Container)
        .item_count(1);
}

#[test]
fn test_errors_carry_the_position() {
    let err = compile_error("Intro\n\n----\nnever closed\n");
    let context = err.context().expect("a positioned error");

    assert_eq!(context.line, 2);
    assert!(err
        .to_string()
        .starts_with("<input>:3:1: parser error: Unclosed block"));
}
