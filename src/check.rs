//! Report suspicious mapping data without changing how the tree is built.
use crate::config::Config;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::{Error, Result};
use crate::mapping::{self, MappingDocument};
use crate::namespace::Normalizer;
use crate::tree::{self, TreeNode};

macro_rules! checks {
    ($($check:expr),* $(,)?) => {
        vec![$(Box::new($check) as Box<dyn Check>),*]
    };
}

/// A mapped property path, as the tree builder sees it.
pub struct PathInfo<'a> {
    pub path: &'a str,
    pub normalized: String,
    pub fields: Vec<usize>,
}

/// What every check may look at.
pub struct Context<'a> {
    pub document: &'a MappingDocument,
    pub nodes: &'a [TreeNode],
    pub root_id: &'a str,
}

pub trait Check {
    fn check_path(&self, _ctx: &Context, _path: &PathInfo, _diagnostics: &mut Vec<Diagnostic>) {
    }

    fn check_document(&self, _ctx: &Context, _diagnostics: &mut Vec<Diagnostic>) {}
}

pub struct Validator {
    checks: Vec<Box<dyn Check>>,
}

impl Validator {
    pub fn validate(&self, document: &MappingDocument, config: &Config) -> Vec<Diagnostic> {
        let mut diagnostics = unresolved_fields(document);
        if !diagnostics.is_empty() {
            return diagnostics;
        }
        let nodes = match tree::build(
            &document.mapping,
            &document.fields_config,
            &document.namespaces,
            &config.root_id,
            &config.root_name,
        ) {
            Ok(nodes) => nodes,
            Err(err) => {
                tracing::warn!(error = %err, "cannot build tree for checks");
                return diagnostics;
            }
        };
        let ctx = Context {
            document,
            nodes: &nodes,
            root_id: &config.root_id,
        };
        let normalizer = Normalizer::new(&document.namespaces);
        for (path, entries) in &document.mapping {
            if mapping::is_excluded(entries) {
                continue;
            }
            let Ok(fields) = tree::displayable_fields(path, entries, &document.fields_config)
            else {
                continue;
            };
            let info = PathInfo {
                path,
                normalized: normalizer.normalize(path),
                fields,
            };
            for check in &self.checks {
                check.check_path(&ctx, &info, &mut diagnostics);
            }
        }
        for check in &self.checks {
            check.check_document(&ctx, &mut diagnostics);
        }
        diagnostics
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            checks: checks![
                EmptySegmentCheck,
                EmptyLeafCheck,
                ShadowedLeafCheck,
                UnknownIdentifierCheck,
            ],
        }
    }
}

pub fn validate(document: &MappingDocument, config: &Config) -> Vec<Diagnostic> {
    Validator::default().validate(document, config)
}

/// Fail with [`Error::Diagnostics`] if any diagnostic is an error.
pub fn ensure_no_errors(diagnostics: &[Diagnostic]) -> Result<()> {
    match diagnostics.iter().filter(|d| d.is_error()).count() {
        0 => Ok(()),
        count => Err(Error::Diagnostics(count)),
    }
}

/// Report every field reference the tree builder would fail on.
fn unresolved_fields(document: &MappingDocument) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for (path, entries) in &document.mapping {
        if mapping::is_excluded(entries) {
            continue;
        }
        for entry in entries.iter().filter(|e| e.is_displayable()) {
            for &index in &entry.fields {
                if document.fields_config.resolve(index).is_none() {
                    diagnostics.push(
                        Diagnostic::error(DiagnosticKind::UnresolvedField { index }).at(path),
                    );
                }
            }
        }
    }
    diagnostics
}

struct EmptySegmentCheck;

impl Check for EmptySegmentCheck {
    fn check_path(&self, _ctx: &Context, path: &PathInfo, diagnostics: &mut Vec<Diagnostic>) {
        if path.normalized.split('/').any(str::is_empty) {
            diagnostics.push(
                Diagnostic::warning(DiagnosticKind::EmptySegment {
                    normalized: path.normalized.clone(),
                })
                .at(path.path),
            );
        }
    }
}

struct EmptyLeafCheck;

impl Check for EmptyLeafCheck {
    fn check_path(&self, _ctx: &Context, path: &PathInfo, diagnostics: &mut Vec<Diagnostic>) {
        if path.fields.is_empty() {
            diagnostics.push(
                Diagnostic::warning(DiagnosticKind::EmptyLeaf {
                    normalized: path.normalized.clone(),
                })
                .at(path.path),
            );
        }
    }
}

/// A path whose leaf collapsed into an earlier node, or sits below an earlier leaf, never shows
/// up in the tree.
struct ShadowedLeafCheck;

impl Check for ShadowedLeafCheck {
    fn check_path(&self, ctx: &Context, path: &PathInfo, diagnostics: &mut Vec<Diagnostic>) {
        let segments: Vec<&str> = path.normalized.split('/').collect();
        let Some((last, ancestors)) = segments.split_last() else {
            return;
        };
        let find = |id: &str, parent: &str| {
            ctx.nodes
                .iter()
                .find(|n| n.id == id && n.name == id && n.parent.as_deref() == Some(parent))
        };
        let mut parent = ctx.root_id;
        let mut hidden_by = None;
        for &segment in ancestors {
            if find(segment, parent).is_some_and(|n| n.leaf) {
                hidden_by = Some(segment);
                break;
            }
            parent = segment;
        }
        if hidden_by.is_none()
            && find(last, parent).is_some_and(|n| !n.leaf || n.fields != path.fields)
        {
            hidden_by = Some(last);
        }
        if let Some(node) = hidden_by {
            diagnostics.push(
                Diagnostic::warning(DiagnosticKind::ShadowedLeaf {
                    normalized: path.normalized.clone(),
                    node: node.to_string(),
                })
                .at(path.path),
            );
        }
    }
}

struct UnknownIdentifierCheck;

impl Check for UnknownIdentifierCheck {
    fn check_document(&self, ctx: &Context, diagnostics: &mut Vec<Diagnostic>) {
        let name = &ctx.document.use_as_id;
        if !name.is_empty() && !ctx.document.fields_config.iter().any(|f| &f.name == name) {
            diagnostics.push(Diagnostic::warning(DiagnosticKind::UnknownIdentifier {
                name: name.clone(),
            }));
        }
    }
}
