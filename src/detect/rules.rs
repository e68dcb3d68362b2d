//! Go documentation rules, evaluated per parsed file.

use serde::{Deserialize, Serialize};

use super::{DocException, ExceptionKind, ExceptionType};
use crate::analysis::{Declaration, DeclarationKind, SourceFile};

/// Which documentation rules are enabled. All are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub readme: bool,
    pub file_comment: bool,
    pub function_comment: bool,
    pub type_comment: bool,
    pub const_comment: bool,
    pub var_comment: bool,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            readme: true,
            file_comment: true,
            function_comment: true,
            type_comment: true,
            const_comment: true,
            var_comment: true,
        }
    }
}

impl RuleSet {
    pub fn is_enabled(&self, kind: ExceptionKind) -> bool {
        match kind {
            ExceptionKind::Readme => self.readme,
            ExceptionKind::FileComment => self.file_comment,
            ExceptionKind::FunctionComment => self.function_comment,
            ExceptionKind::TypeComment => self.type_comment,
            ExceptionKind::ConstComment => self.const_comment,
            ExceptionKind::VarComment => self.var_comment,
        }
    }
}

/// Evaluate every enabled rule against one file's top-level declarations.
pub fn check_file(file: &SourceFile, rules: &RuleSet) -> Vec<DocException> {
    let path = file.display_path();
    let mut out = Vec::new();

    for decl in file.declarations() {
        let kind = match decl.kind() {
            DeclarationKind::Package => ExceptionKind::FileComment,
            DeclarationKind::Function | DeclarationKind::Method => ExceptionKind::FunctionComment,
            DeclarationKind::Type => ExceptionKind::TypeComment,
            DeclarationKind::Const => ExceptionKind::ConstComment,
            DeclarationKind::Var => ExceptionKind::VarComment,
            DeclarationKind::Import => continue,
        };
        if !rules.is_enabled(kind) {
            continue;
        }

        match kind {
            ExceptionKind::FileComment => check_package(&decl, &path, &mut out),
            ExceptionKind::FunctionComment => check_function(&decl, &path, &mut out),
            ExceptionKind::TypeComment => check_type(&decl, &path, &mut out),
            ExceptionKind::ConstComment | ExceptionKind::VarComment => {
                if decl.is_grouped() {
                    check_value_group(&decl, kind, &path, &mut out);
                } else {
                    check_value_specs(&decl, kind, &path, &mut out);
                }
            }
            ExceptionKind::Readme => {}
        }
    }
    out
}

/// File comment: first line must begin with "Package <name>".
fn check_package(decl: &Declaration, path: &str, out: &mut Vec<DocException>) {
    let Some(name) = decl.name() else {
        return;
    };
    let expected = format!("Package {}", name.text);
    let documented = decl
        .doc()
        .map(|doc| doc.first_line().starts_with(&expected))
        .unwrap_or(false);

    if !documented {
        out.push(DocException::new(
            path,
            ExceptionType::single(ExceptionKind::FileComment),
            decl.span().start_line,
        ));
    }
}

fn check_function(decl: &Declaration, path: &str, out: &mut Vec<DocException>) {
    let Some(name) = decl.name() else {
        return;
    };
    let documented = decl
        .doc()
        .map(|doc| doc.starts_with_name(&name.text))
        .unwrap_or(false);

    if !documented {
        let element = decl.qualified_name().unwrap_or_else(|| name.text.clone());
        out.push(
            DocException::new(
                path,
                ExceptionType::single(ExceptionKind::FunctionComment),
                name.span.start_line,
            )
            .element(element),
        );
    }
}

/// Every type name needs a comment starting with that name. Inside a
/// parenthesized block the comment sits on the spec itself.
fn check_type(decl: &Declaration, path: &str, out: &mut Vec<DocException>) {
    let grouped = decl.is_grouped();
    for spec in decl.specs() {
        let doc = if grouped { spec.doc() } else { decl.doc() };
        for name in spec.names() {
            let documented = doc
                .as_ref()
                .map(|d| d.starts_with_name(&name.text))
                .unwrap_or(false);
            if !documented {
                out.push(
                    DocException::new(
                        path,
                        ExceptionType::single(ExceptionKind::TypeComment),
                        name.span.start_line,
                    )
                    .element(name.text),
                );
            }
        }
    }
}

/// Parenthesized const/var block: one group comment on the block, plus a
/// trailing comment for every bound name.
fn check_value_group(
    decl: &Declaration,
    kind: ExceptionKind,
    path: &str,
    out: &mut Vec<DocException>,
) {
    let has_group_doc = decl.doc().map(|d| !d.is_empty()).unwrap_or(false);
    if !has_group_doc {
        // The constructor logs the illegal combination; nothing to report then.
        if let Ok(group) = ExceptionType::new(kind, true) {
            let span = decl.span();
            out.push(DocException::new(path, group, span.start_line).end_line(span.end_line));
        }
    }

    let trailing = decl.trailing_comments();
    for spec in decl.specs() {
        let names = spec.names();
        let multi = names.len() > 1;
        for name in names {
            if trailing.for_name(&name).is_some() {
                continue;
            }
            out.push(
                DocException::new(path, ExceptionType::single(kind), name.span.start_line)
                    .element(name.text)
                    .multi_name(multi),
            );
        }
    }
}

/// Single const/var statement: one leading comment per specification.
fn check_value_specs(
    decl: &Declaration,
    kind: ExceptionKind,
    path: &str,
    out: &mut Vec<DocException>,
) {
    let documented = decl.doc().map(|d| !d.is_empty()).unwrap_or(false);
    if documented {
        return;
    }

    for spec in decl.specs() {
        let names = spec.names();
        let Some(first) = names.first() else {
            continue;
        };
        let line = first.span.start_line;
        let element = names
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.push(
            DocException::new(path, ExceptionType::single(kind), line)
                .element(element)
                .multi_name(names.len() > 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{GoAnalyzer, LanguageAnalyzer};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn check(source: &str) -> Vec<DocException> {
        let parsed = GoAnalyzer::new()
            .parse(Path::new("demo.go"), source.as_bytes())
            .unwrap();
        let file = SourceFile::new("demo.go", parsed);
        check_file(&file, &RuleSet::default())
    }

    fn codes(exceptions: &[DocException]) -> Vec<(&'static str, usize, String)> {
        exceptions
            .iter()
            .map(|e| (e.kind.code(), e.line, e.element.clone()))
            .collect()
    }

    #[test]
    fn test_missing_file_and_function_comment() {
        let exceptions = check("package demo\n\nfunc Foo() {}\n");
        assert_eq!(
            codes(&exceptions),
            vec![
                ("file_comment", 1, String::new()),
                ("function_comment", 3, "Foo".to_string()),
            ]
        );
    }

    #[test]
    fn test_documented_file_is_clean() {
        let exceptions = check(
            r#"// Package demo shows a clean file.
package demo

// Foo does nothing.
func Foo() {}

// Config holds settings.
type Config struct{}

// Validate checks the config.
func (c *Config) Validate() error { return nil }

// Limit caps retries.
const Limit = 3
"#,
        );
        assert!(exceptions.is_empty(), "unexpected: {:?}", exceptions);
    }

    #[test]
    fn test_file_comment_must_name_package() {
        let exceptions = check("// Package other is wrong.\npackage demo\n");
        assert_eq!(codes(&exceptions), vec![("file_comment", 2, String::new())]);
    }

    #[test]
    fn test_function_comment_separator() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

// Foo(x) is fine.
func Foo() {}

// Foobar is not about Foo.
func Foo2() {}

// Bar	is fine with a tab.
func Bar() {}
"#,
        );
        assert_eq!(
            codes(&exceptions),
            vec![("function_comment", 8, "Foo2".to_string())]
        );
    }

    #[test]
    fn test_method_element_is_qualified() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

// Config holds settings.
type Config struct{}

// Check is the wrong name.
func (c *Config) Validate() error { return nil }
"#,
        );
        assert_eq!(
            codes(&exceptions),
            vec![("function_comment", 8, "*Config.Validate".to_string())]
        );
    }

    #[test]
    fn test_grouped_const_without_comments() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

const (
	A = 1
	B = 2
	C = 3
)
"#,
        );
        assert_eq!(exceptions.len(), 4);
        assert_eq!(exceptions[0].kind.code(), "const_group_comment");
        assert_eq!(exceptions[0].line, 4);
        assert_eq!(exceptions[0].end_line, Some(8));
        assert_eq!(exceptions[0].element, "");
        assert_eq!(
            codes(&exceptions[1..]),
            vec![
                ("const_comment", 5, "A".to_string()),
                ("const_comment", 6, "B".to_string()),
                ("const_comment", 7, "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_grouped_var_with_trailing_comments() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

// Defaults for the client.
var (
	host = "localhost" // host to dial
	x, y = 1, 2
)
"#,
        );
        assert_eq!(
            codes(&exceptions),
            vec![
                ("var_comment", 7, "x".to_string()),
                ("var_comment", 7, "y".to_string()),
            ]
        );
        assert!(exceptions.iter().all(|e| e.multi_name));
    }

    #[test]
    fn test_ungrouped_multi_name_var() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

var a, b = 1, 2
"#,
        );
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].kind.code(), "var_comment");
        assert_eq!(exceptions[0].line, 4);
        assert_eq!(exceptions[0].element, "a, b");
        assert!(exceptions[0].multi_name);
    }

    #[test]
    fn test_grouped_multi_name_const_reports_each_name() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

// Limits for the demo.
const (
	A = 1 // first
	B, C = 2, 3
)
"#,
        );
        assert_eq!(
            codes(&exceptions),
            vec![
                ("const_comment", 7, "B".to_string()),
                ("const_comment", 7, "C".to_string()),
            ]
        );
        assert!(exceptions.iter().all(|e| e.multi_name));
    }

    #[test]
    fn test_ungrouped_multi_name_const() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

const X, Y = 1, 2
"#,
        );
        assert_eq!(codes(&exceptions), vec![("const_comment", 4, "X, Y".to_string())]);
        assert!(exceptions[0].multi_name);
    }

    #[test]
    fn test_grouped_types_use_spec_comments() {
        let exceptions = check(
            r#"// Package demo is a demo.
package demo

// Shared comment does not count for grouped types.
type (
	// Point is a point.
	Point struct{ X, Y int }
	Size int
)
"#,
        );
        assert_eq!(codes(&exceptions), vec![("type_comment", 8, "Size".to_string())]);
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let parsed = GoAnalyzer::new()
            .parse(Path::new("demo.go"), b"package demo\n\nfunc Foo() {}\n")
            .unwrap();
        let file = SourceFile::new("demo.go", parsed);
        let rules = RuleSet {
            file_comment: false,
            ..RuleSet::default()
        };
        let exceptions = check_file(&file, &rules);
        assert_eq!(codes(&exceptions), vec![("function_comment", 3, "Foo".to_string())]);
    }
}
