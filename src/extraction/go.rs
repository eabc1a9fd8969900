use crate::core::{DeclKind, DeclNode, Declaration, Extracted, ImportSpec, Origin};
use crate::errors::{Result, SplitError};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tree_sitter::{Node, Parser, Tree};

/// Declarations extracted from one Go source file, in source order.
#[derive(Debug)]
pub struct ExtractedFile {
    pub path: PathBuf,
    /// Name from the `package` clause.
    pub package: String,
    pub items: Vec<Extracted>,
}

impl ExtractedFile {
    pub fn declaration_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.kind() != DeclKind::Import)
            .count()
    }
}

pub struct GoExtractor {
    parser: Parser,
}

impl GoExtractor {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| SplitError::Language(e.to_string()))?;
        Ok(Self { parser })
    }

    fn parse_tree(&mut self, path: &Path, content: &str) -> Result<Tree> {
        let tree = self
            .parser
            .parse(content, None)
            .ok_or_else(|| SplitError::parse(path, 0, "parser produced no tree"))?;

        if let Some(bad) = first_error(tree.root_node()) {
            let message = if bad.is_missing() {
                format!("missing {}", bad.kind())
            } else {
                format!("unexpected `{}`", snippet(&content[bad.byte_range()]))
            };
            return Err(SplitError::parse(path, line_of(&bad), message));
        }
        Ok(tree)
    }

    /// Parse `content` and extract every package-level declaration.
    pub fn extract(&mut self, path: &Path, content: &str) -> Result<ExtractedFile> {
        let tree = self.parse_tree(path, content)?;
        let file = FileSource { path, content };
        file.extract(tree.root_node())
    }
}

struct FileSource<'a> {
    path: &'a Path,
    content: &'a str,
}

impl<'a> FileSource<'a> {
    fn text(&self, node: &Node<'_>) -> &'a str {
        &self.content[node.byte_range()]
    }

    fn malformed(&self, node: &Node<'_>, kind: DeclKind, detail: &str) -> SplitError {
        SplitError::malformed(self.path, line_of(node), kind.keyword(), detail)
    }

    fn extract(&self, root: Node<'_>) -> Result<ExtractedFile> {
        let mut package = None;
        let mut items = Vec::new();
        let mut comments = CommentRun::default();
        // Item index, start byte and end row of the previous declaration.
        let mut last_decl: Option<(usize, usize, usize)> = None;
        // End row of the previous package or import clause.
        let mut last_clause_row: Option<usize> = None;

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if child.kind() == "comment" {
                let row = child.start_position().row;
                // Trailing comment on the same line as the previous declaration.
                if let Some((index, start, end_row)) = last_decl {
                    if row == end_row {
                        if let Some(Extracted::Decl(decl)) = items.get_mut(index) {
                            let origin = decl.node.origin().clone();
                            decl.node =
                                DeclNode::new(&self.content[start..child.end_byte()], origin);
                        }
                        continue;
                    }
                }
                // Trailing comments of package and import clauses are dropped.
                if last_clause_row == Some(row) {
                    trace!("dropping clause comment at line {}", row + 1);
                    continue;
                }
                comments.push(&child);
                continue;
            }

            let leading = comments.take_attached(&child);
            match child.kind() {
                "package_clause" => {
                    package = Some(self.package_name(&child)?);
                    last_decl = None;
                    last_clause_row = Some(child.end_position().row);
                }
                "import_declaration" => {
                    items.extend(self.imports(&child).into_iter().map(Extracted::Import));
                    last_decl = None;
                    last_clause_row = Some(child.end_position().row);
                }
                _ => {
                    let start = leading.unwrap_or_else(|| child.start_byte());
                    let decl = self.declaration(&child, start)?;
                    debug!(
                        "{} {} {}",
                        decl.kind,
                        decl.name,
                        if decl.kind == DeclKind::Func {
                            &decl.receiver_type
                        } else {
                            &decl.declared_type
                        }
                    );
                    items.push(Extracted::Decl(decl));
                    last_decl = Some((items.len() - 1, start, child.end_position().row));
                    last_clause_row = None;
                }
            }
        }

        let package =
            package.ok_or_else(|| SplitError::parse(self.path, 1, "missing package clause"))?;
        Ok(ExtractedFile {
            path: self.path.to_path_buf(),
            package,
            items,
        })
    }

    fn package_name(&self, node: &Node<'_>) -> Result<String> {
        let mut cursor = node.walk();
        let ident = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "package_identifier");
        ident.map(|n| self.text(&n).to_string()).ok_or_else(|| {
            SplitError::parse(self.path, line_of(node), "package clause without a name")
        })
    }

    fn declaration(&self, node: &Node<'_>, start: usize) -> Result<Declaration> {
        let origin = Origin::new(self.path, line_of(node));
        let decl_node = DeclNode::new(&self.content[start..node.end_byte()], origin);

        match node.kind() {
            "type_declaration" => {
                let spec = first_spec(node, &["type_spec", "type_alias"], None).ok_or_else(|| {
                    self.malformed(node, DeclKind::Type, "declaration group has no type spec")
                })?;
                let name = self.field_text(&spec, "name", DeclKind::Type)?;
                Ok(Declaration::type_decl(name, decl_node))
            }
            "var_declaration" => {
                let (name, declared) =
                    self.value_spec(node, "var_spec", "var_spec_list", DeclKind::Var)?;
                Ok(Declaration::var(name, declared, decl_node))
            }
            "const_declaration" => {
                let (name, declared) =
                    self.value_spec(node, "const_spec", "const_spec_list", DeclKind::Const)?;
                Ok(Declaration::constant(name, declared, decl_node))
            }
            "function_declaration" => {
                let name = self.field_text(node, "name", DeclKind::Func)?;
                Ok(Declaration::func(name, "", decl_node))
            }
            "method_declaration" => {
                let name = self.field_text(node, "name", DeclKind::Func)?;
                let receiver = self.receiver_type(node)?;
                Ok(Declaration::func(name, receiver, decl_node))
            }
            other => Err(SplitError::malformed(
                self.path,
                line_of(node),
                other,
                "not a package-level declaration",
            )),
        }
    }

    fn field_text(&self, node: &Node<'_>, field: &str, kind: DeclKind) -> Result<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(&n).to_string())
            .ok_or_else(|| self.malformed(node, kind, &format!("missing {}", field)))
    }

    /// Name and declared type of the first spec of a var or const declaration.
    fn value_spec(
        &self,
        node: &Node<'_>,
        spec_kind: &str,
        list_kind: &str,
        kind: DeclKind,
    ) -> Result<(String, String)> {
        let spec = first_spec(node, &[spec_kind], Some(list_kind))
            .ok_or_else(|| self.malformed(node, kind, "empty declaration group"))?;
        let name = self.field_text(&spec, "name", kind)?;
        let declared = self.declared_type(&spec).unwrap_or_default();
        Ok((name, declared))
    }

    fn declared_type(&self, spec: &Node<'_>) -> Option<String> {
        if let Some(name) = spec
            .child_by_field_name("type")
            .and_then(|ty| self.annotation_name(&ty))
        {
            return Some(name);
        }

        let values = spec.child_by_field_name("value")?;
        let mut cursor = values.walk();
        let first = values
            .named_children(&mut cursor)
            .find(|c| c.kind() != "comment")?;
        match first.kind() {
            "composite_literal" => self.literal_type(&first),
            "unary_expression" => first
                .child_by_field_name("operand")
                .filter(|operand| operand.kind() == "composite_literal")
                .and_then(|literal| self.literal_type(&literal)),
            _ => None,
        }
    }

    /// `T` or `*T` where `T` is a plain identifier.
    fn annotation_name(&self, ty: &Node<'_>) -> Option<String> {
        match ty.kind() {
            "type_identifier" => Some(self.text(ty).to_string()),
            "pointer_type" => ty
                .named_child(0)
                .filter(|inner| inner.kind() == "type_identifier")
                .map(|inner| self.text(&inner).to_string()),
            _ => None,
        }
    }

    fn literal_type(&self, literal: &Node<'_>) -> Option<String> {
        literal
            .child_by_field_name("type")
            .filter(|ty| ty.kind() == "type_identifier")
            .map(|ty| self.text(&ty).to_string())
    }

    fn receiver_type(&self, method: &Node<'_>) -> Result<String> {
        let receiver = method
            .child_by_field_name("receiver")
            .ok_or_else(|| self.malformed(method, DeclKind::Func, "method without receiver"))?;
        let mut cursor = receiver.walk();
        let param = receiver
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")
            .ok_or_else(|| self.malformed(method, DeclKind::Func, "empty receiver list"))?;

        let mut ty = param.child_by_field_name("type");
        while let Some(node) = ty {
            ty = match node.kind() {
                "type_identifier" => return Ok(self.text(&node).to_string()),
                "pointer_type" | "parenthesized_type" => node.named_child(0),
                "generic_type" => node.child_by_field_name("type"),
                _ => None,
            };
        }
        trace!("method at line {} has no base receiver identifier", line_of(method));
        Ok(String::new())
    }

    fn imports(&self, node: &Node<'_>) -> Vec<ImportSpec> {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => specs.extend(self.import_spec(&child)),
                "import_spec_list" => {
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() == "import_spec" {
                            specs.extend(self.import_spec(&spec));
                        }
                    }
                }
                _ => {}
            }
        }
        specs
    }

    fn import_spec(&self, spec: &Node<'_>) -> Option<ImportSpec> {
        let path = spec.child_by_field_name("path")?;
        let alias = spec.child_by_field_name("name").map(|n| self.text(&n));
        let import = ImportSpec::new(alias, self.text(&path));
        debug!("import {} {}", import.alias.as_deref().unwrap_or(""), import.path);
        Some(import)
    }
}

/// Comments seen since the last declaration, tracked as one contiguous run.
#[derive(Default)]
struct CommentRun {
    start_byte: Option<usize>,
    end_row: usize,
}

impl CommentRun {
    fn push(&mut self, comment: &Node<'_>) {
        let start_row = comment.start_position().row;
        if self.start_byte.is_none() || start_row > self.end_row + 1 {
            self.start_byte = Some(comment.start_byte());
        }
        self.end_row = comment.end_position().row;
    }

    /// Start byte of the run if it ends on the line right above `node` or on
    /// the line `node` starts on.
    fn take_attached(&mut self, node: &Node<'_>) -> Option<usize> {
        let start = self.start_byte.take()?;
        let row = node.start_position().row;
        (self.end_row == row || self.end_row + 1 == row).then_some(start)
    }
}

fn first_spec<'t>(node: &Node<'t>, spec_kinds: &[&str], list_kind: Option<&str>) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if spec_kinds.contains(&child.kind()) {
            return Some(child);
        }
        if Some(child.kind()) == list_kind {
            let mut inner = child.walk();
            let found = child
                .named_children(&mut inner)
                .find(|c| spec_kinds.contains(&c.kind()));
            return found;
        }
    }
    None
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

fn line_of(node: &Node<'_>) -> usize {
    node.start_position().row + 1
}

fn snippet(text: &str) -> &str {
    let line = text.lines().next().unwrap_or("");
    match line.char_indices().nth(40) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}
