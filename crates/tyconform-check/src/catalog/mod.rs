//! The catalog: declarations merged across declaration files.
//!
//! Building happens in two passes. The first collects the qualified name of
//! every declared type so references can be resolved regardless of order;
//! the second lowers each declaration into [`TypeDef`]s and value types.
//! Interfaces with the same name merge, functions with the same name
//! become overloads, other duplicates are reported.
//!
//! Named types stay lazy: [`Catalog::shape_of`] and
//! [`Catalog::expand_alias`] instantiate them when the checker needs their
//! structure.

mod lower;

pub(crate) use lower::Lowerer;

use crate::error::TypeError;
use crate::types::{normalize, ObjectShape, PrimTy, PropTy, Signature, Ty};
use hashbrown::{HashMap, HashSet};
use tyconform_log::{debug, trace};
use tyconform_syntax::ast::{Decl, DeclFile, TypeExpr};
use tyconform_syntax::{Span, Spanned};

/// Deepest chain of bases or aliases followed before giving up.
const MAX_DEPTH: usize = 32;

/// A declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef {
    /// `interface Name<T> extends Base { ... }`
    Interface {
        /// Type parameter names
        type_params: Vec<String>,
        /// Own members of all merged declarations
        shape: ObjectShape,
        /// `extends` clauses
        bases: Vec<Ty>,
        /// First declaration
        span: Span,
    },

    /// `declare class Name<T> extends Base { ... }`
    Class {
        /// Type parameter names
        type_params: Vec<String>,
        /// Instance members
        instance: ObjectShape,
        /// Static members
        statics: ObjectShape,
        /// Constructor signatures, returning the instance type
        ctors: Vec<Signature>,
        /// `extends` clause
        base: Option<Ty>,
        /// Declaration
        span: Span,
    },

    /// `type Name<T> = ...`
    Alias {
        /// Type parameter names
        type_params: Vec<String>,
        /// Aliased type
        ty: Ty,
        /// Declaration
        span: Span,
    },
}

impl TypeDef {
    /// Type parameter names.
    #[must_use]
    pub fn type_params(&self) -> &[String] {
        match self {
            Self::Interface { type_params, .. } | Self::Class { type_params, .. } | Self::Alias { type_params, .. } => {
                type_params
            }
        }
    }
}

/// A declared value: function, variable or class constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueDef {
    /// Value type; overloaded functions collect their signatures
    pub ty: Ty,
    /// First declaration
    pub span: Span,
}

/// An error found while building the catalog, with the index of the
/// declaration file it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogDiagnostic {
    /// Index of the file in the order files were added
    pub file: usize,
    /// The error
    pub error: TypeError,
}

/// Merged declarations a fixture is checked against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    types: HashMap<String, TypeDef>,
    values: HashMap<String, ValueDef>,
}

/// Collects declaration files and builds a [`Catalog`].
///
/// ```
/// use tyconform_check::Catalog;
/// use tyconform_syntax::parse_declarations;
///
/// let decls = parse_declarations("declare function fork(env?: any): number;").unwrap();
/// let (catalog, errors) = Catalog::builder().file(&decls).build();
/// assert!(errors.is_empty());
/// assert!(catalog.value("fork").is_some());
/// ```
#[derive(Debug, Default)]
pub struct CatalogBuilder<'a> {
    files: Vec<&'a DeclFile>,
}

impl<'a> CatalogBuilder<'a> {
    /// Adds a declaration file.
    #[must_use]
    pub fn file(mut self, file: &'a DeclFile) -> Self {
        self.files.push(file);
        self
    }

    /// Adds a declaration file in place.
    pub fn add(&mut self, file: &'a DeclFile) {
        self.files.push(file);
    }

    /// Builds the catalog. Errors are reported alongside the catalog so a
    /// single bad declaration does not hide the rest.
    #[must_use]
    pub fn build(self) -> (Catalog, Vec<CatalogDiagnostic>) {
        let mut type_names = HashSet::new();
        for file in &self.files {
            collect_type_names(&file.decls, "", &mut type_names);
        }
        debug!(files = self.files.len(), types = type_names.len(), "building catalog");

        let is_type = |name: &str| type_names.contains(name);
        let mut state = BuildState {
            catalog: Catalog::default(),
            errors: Vec::new(),
            file: 0,
            origins: HashMap::new(),
        };

        for (index, file) in self.files.iter().enumerate() {
            state.file = index;
            let mut lowerer = Lowerer::new(&is_type);
            for decl in &file.decls {
                state.add_decl(&mut lowerer, decl);
            }
            state.flush(&mut lowerer);
        }
        state.report_base_cycles();

        debug!(
            types = state.catalog.types.len(),
            values = state.catalog.values.len(),
            errors = state.errors.len(),
            "catalog built"
        );
        (state.catalog, state.errors)
    }
}

fn collect_type_names(decls: &[Decl], prefix: &str, names: &mut HashSet<String>) {
    for decl in decls {
        let qualified = if prefix.is_empty() {
            decl.name().name.clone()
        } else {
            format!("{prefix}.{}", decl.name().name)
        };
        match decl {
            Decl::Interface { .. } | Decl::Class { .. } | Decl::TypeAlias { .. } => {
                names.insert(qualified);
            }
            Decl::Namespace { body, .. } => collect_type_names(body, &qualified, names),
            Decl::Function { .. } | Decl::Variable { .. } => {}
        }
    }
}

struct BuildState {
    catalog: Catalog,
    errors: Vec<CatalogDiagnostic>,
    file: usize,
    /// File index each type was first declared in
    origins: HashMap<String, usize>,
}

impl BuildState {
    fn flush(&mut self, lowerer: &mut Lowerer<'_>) {
        let file = self.file;
        self.errors
            .extend(lowerer.errors.drain(..).map(|error| CatalogDiagnostic { file, error }));
    }

    fn duplicate(&mut self, name: String, previous: Span, span: Span) {
        self.errors.push(CatalogDiagnostic {
            file: self.file,
            error: TypeError::DuplicateDeclaration { name, previous, span },
        });
    }

    fn insert_type(&mut self, name: String, def: TypeDef) {
        self.origins.entry(name.clone()).or_insert(self.file);
        self.catalog.types.insert(name, def);
    }

    /// Reports every `extends` clause that closes a cycle. Names are
    /// visited in sorted order so the same cycle is always reported at the
    /// same declaration.
    fn report_base_cycles(&mut self) {
        let mut names: Vec<String> = self.catalog.types.keys().cloned().collect();
        names.sort_unstable();
        let mut done = HashSet::new();
        let mut path = Vec::new();
        for name in &names {
            self.visit_bases(name, &mut path, &mut done);
        }
    }

    fn visit_bases(&mut self, name: &str, path: &mut Vec<String>, done: &mut HashSet<String>) {
        if done.contains(name) {
            return;
        }
        path.push(name.to_string());
        for base in self.catalog.base_names(name) {
            if path.contains(&base) {
                let span = self.catalog.types.get(name).map_or_else(Span::default, Spanned::span);
                let file = self.origins.get(name).copied().unwrap_or(self.file);
                self.errors.push(CatalogDiagnostic {
                    file,
                    error: TypeError::CyclicBase {
                        name: name.to_string(),
                        base,
                        span,
                    },
                });
            } else {
                self.visit_bases(&base, path, done);
            }
        }
        path.pop();
        done.insert(name.to_string());
    }

    fn add_decl(&mut self, lowerer: &mut Lowerer<'_>, decl: &Decl) {
        let qualified = lowerer.qualify(&decl.name().name);
        trace!(name = %qualified, "lowering declaration");

        match decl {
            Decl::Interface {
                type_params,
                extends,
                members,
                span,
                ..
            } => {
                lowerer.set_type_params(type_params);
                let bases: Vec<Ty> = extends.iter().map(|b| lowerer.lower(b)).collect();
                let (shape, _) = lowerer.lower_members(members);
                lowerer.set_type_params(&[]);
                self.add_interface(qualified, names(type_params), shape, bases, *span);
            }

            Decl::Class {
                type_params,
                extends,
                members,
                span,
                ..
            } => {
                lowerer.set_type_params(type_params);
                let base = extends.as_ref().map(|b| lowerer.lower(b));
                let (mut instance, statics) = lowerer.lower_members(members);
                lowerer.set_type_params(&[]);

                let instance_ty = Ty::Named {
                    name: qualified.clone(),
                    args: type_params.iter().map(|p| Ty::Param(p.name.clone())).collect(),
                };
                let ctors = std::mem::take(&mut instance.constructs)
                    .into_iter()
                    .map(|sig| Signature {
                        ret: instance_ty.clone(),
                        ..sig
                    })
                    .collect();
                self.add_class(qualified, names(type_params), instance, statics, ctors, base, *span);
            }

            Decl::TypeAlias {
                type_params, ty, span, ..
            } => {
                lowerer.set_type_params(type_params);
                let ty = lowerer.lower(ty);
                lowerer.set_type_params(&[]);
                if let Some(previous) = self.catalog.types.get(&qualified) {
                    let previous = previous.span();
                    self.duplicate(qualified, previous, *span);
                } else {
                    self.insert_type(
                        qualified,
                        TypeDef::Alias {
                            type_params: names(type_params),
                            ty,
                            span: *span,
                        },
                    );
                }
            }

            Decl::Function { sig, span, .. } => {
                let sig = lowerer.lower_signature(sig);
                match self.catalog.values.get_mut(&qualified) {
                    Some(ValueDef {
                        ty: Ty::Function(sigs), ..
                    }) => sigs.push(sig),
                    Some(previous) => {
                        let previous = previous.span;
                        self.duplicate(qualified, previous, *span);
                    }
                    None => {
                        self.catalog.values.insert(
                            qualified,
                            ValueDef {
                                ty: Ty::Function(vec![sig]),
                                span: *span,
                            },
                        );
                    }
                }
            }

            Decl::Variable { ty, span, .. } => {
                let ty = ty.as_ref().map_or(Ty::Any, |ty| lowerer.lower(ty));
                self.add_value(qualified, ty, *span);
            }

            Decl::Namespace { name, body, .. } => {
                lowerer.enter_namespace(&name.name);
                for decl in body {
                    self.add_decl(lowerer, decl);
                }
                lowerer.exit_namespace();
            }
        }
    }

    fn add_value(&mut self, name: String, ty: Ty, span: Span) {
        if let Some(previous) = self.catalog.values.get(&name) {
            let previous = previous.span;
            self.duplicate(name, previous, span);
        } else {
            self.catalog.values.insert(name, ValueDef { ty, span });
        }
    }

    fn add_interface(&mut self, name: String, type_params: Vec<String>, shape: ObjectShape, bases: Vec<Ty>, span: Span) {
        match self.catalog.types.get_mut(&name) {
            Some(TypeDef::Interface {
                shape: existing,
                bases: existing_bases,
                ..
            }) => {
                existing.merge(shape);
                existing_bases.extend(bases);
            }
            Some(TypeDef::Class { instance, .. }) => instance.merge(shape),
            Some(TypeDef::Alias { span: previous, .. }) => {
                let previous = *previous;
                self.duplicate(name, previous, span);
            }
            None => {
                self.insert_type(
                    name,
                    TypeDef::Interface {
                        type_params,
                        shape,
                        bases,
                        span,
                    },
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_class(
        &mut self,
        name: String,
        type_params: Vec<String>,
        mut instance: ObjectShape,
        statics: ObjectShape,
        ctors: Vec<Signature>,
        base: Option<Ty>,
        span: Span,
    ) {
        match self.catalog.types.remove(&name) {
            None => {}
            Some(TypeDef::Interface { shape, .. }) => {
                let mut merged = shape;
                merged.merge(instance);
                instance = merged;
            }
            Some(previous) => {
                let previous_span = previous.span();
                self.catalog.types.insert(name.clone(), previous);
                self.duplicate(name, previous_span, span);
                return;
            }
        }

        self.add_value(name.clone(), Ty::ClassCtor(name.clone()), span);
        self.insert_type(
            name,
            TypeDef::Class {
                type_params,
                instance,
                statics,
                ctors,
                base,
                span,
            },
        );
    }
}

fn names(params: &[tyconform_syntax::ast::Ident]) -> Vec<String> {
    params.iter().map(|p| p.name.clone()).collect()
}

impl Catalog {
    /// Starts building a catalog.
    #[must_use]
    pub fn builder<'a>() -> CatalogBuilder<'a> {
        CatalogBuilder::default()
    }

    /// Looks up a declared value by qualified name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&ValueDef> {
        self.values.get(name)
    }

    /// Looks up a declared type by qualified name.
    #[must_use]
    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Number of declared types and values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len() + self.values.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.values.is_empty()
    }

    /// Lowers an annotation written in a fixture. Unknown names are
    /// returned as errors and lower to the error type.
    pub fn resolve_type(&self, ty: &TypeExpr) -> (Ty, Vec<TypeError>) {
        let is_type = |name: &str| self.types.contains_key(name);
        let mut lowerer = Lowerer::new(&is_type);
        let ty = lowerer.lower(ty);
        (ty, lowerer.errors)
    }

    /// Expands a type alias reference until it is not an alias.
    #[must_use]
    pub fn expand_alias(&self, ty: &Ty) -> Ty {
        let mut current = ty.clone();
        for _ in 0..MAX_DEPTH {
            match &current {
                Ty::Named { name, args } => match self.types.get(name) {
                    Some(TypeDef::Alias { type_params, ty, .. }) => {
                        current = ty.substitute(type_params, args);
                    }
                    _ => return current,
                },
                _ => return current,
            }
        }
        current
    }

    /// Expands aliases everywhere inside `ty`.
    ///
    /// An alias met again while its own expansion is in progress stays a
    /// named reference, so recursive aliases expand one level.
    #[must_use]
    pub fn expand_deep(&self, ty: &Ty) -> Ty {
        self.expand_deep_in(ty, &mut Vec::new())
    }

    fn expand_deep_in(&self, ty: &Ty, expanding: &mut Vec<String>) -> Ty {
        let mark = expanding.len();
        let mut current = ty.clone();
        while let Ty::Named { name, args } = &current {
            if expanding.contains(name) {
                break;
            }
            let Some(TypeDef::Alias { type_params, ty, .. }) = self.types.get(name) else {
                break;
            };
            expanding.push(name.clone());
            current = ty.substitute(type_params, args);
        }
        let expanded = current.map_children(&mut |child| self.expand_deep_in(child, expanding));
        expanding.truncate(mark);
        expanded
    }

    /// Canonical form used to compare `$ExpectType` annotations: aliases
    /// expanded, unions normalized.
    #[must_use]
    pub fn canonical(&self, ty: &Ty) -> Ty {
        normalize(&self.expand_deep(ty))
    }

    /// Members of an object-like type, with bases and type arguments
    /// applied. `None` when the type has no object structure the catalog
    /// knows about.
    #[must_use]
    pub fn shape_of(&self, ty: &Ty) -> Option<ObjectShape> {
        self.shape_in(ty, &mut Vec::new())
    }

    /// `visiting` holds the named types whose shape is being built; a base
    /// chain that leads back to one of them contributes nothing.
    fn shape_in(&self, ty: &Ty, visiting: &mut Vec<String>) -> Option<ObjectShape> {
        match ty {
            Ty::Object(shape) => Some((**shape).clone()),
            Ty::Named { name, args } => self.named_shape(name, args, visiting),
            Ty::Array(elem) => Some(self.array_shape(elem, visiting)),
            Ty::ClassCtor(name) => self.ctor_shape(name, visiting),
            Ty::Function(sigs) => {
                let mut shape = self.named_shape("Function", &[], visiting).unwrap_or_default();
                shape.calls = sigs.clone();
                Some(shape)
            }
            Ty::Primitive(PrimTy::String) => Some(self.named_shape("String", &[], visiting).unwrap_or_default()),
            Ty::Primitive(PrimTy::Number) => Some(self.named_shape("Number", &[], visiting).unwrap_or_default()),
            Ty::Primitive(PrimTy::Boolean) => Some(self.named_shape("Boolean", &[], visiting).unwrap_or_default()),
            Ty::Primitive(PrimTy::Object) => Some(ObjectShape::default()),
            Ty::Literal(lit) => self.shape_in(&Ty::Primitive(lit.base()), visiting),
            _ => None,
        }
    }

    fn named_shape(&self, name: &str, args: &[Ty], visiting: &mut Vec<String>) -> Option<ObjectShape> {
        if visiting.iter().any(|v| v == name) {
            return None;
        }
        let def = self.types.get(name)?;
        visiting.push(name.to_string());
        let shape = match def {
            TypeDef::Interface {
                type_params,
                shape,
                bases,
                ..
            } => {
                let own = Ty::substitute_shape(shape, type_params, args);
                let mut merged = ObjectShape::default();
                for base in bases {
                    let base = base.substitute(type_params, args);
                    if let Some(base_shape) = self.shape_in(&base, visiting) {
                        merged.overlay(base_shape);
                    }
                }
                merged.overlay(own);
                Some(merged)
            }
            TypeDef::Class {
                type_params,
                instance,
                base,
                ..
            } => {
                let own = Ty::substitute_shape(instance, type_params, args);
                let mut merged = match base {
                    Some(base) => self
                        .shape_in(&base.substitute(type_params, args), visiting)
                        .unwrap_or_default(),
                    None => ObjectShape::default(),
                };
                merged.overlay(own);
                Some(merged)
            }
            TypeDef::Alias { type_params, ty, .. } => self.shape_in(&ty.substitute(type_params, args), visiting),
        };
        visiting.pop();
        shape
    }

    fn array_shape(&self, elem: &Ty, visiting: &mut Vec<String>) -> ObjectShape {
        if let Some(shape) = self.named_shape("Array", std::slice::from_ref(elem), visiting) {
            return shape;
        }
        let mut shape = ObjectShape::default();
        shape.insert(PropTy {
            name: "length".to_string(),
            ty: Ty::NUMBER,
            optional: false,
            readonly: false,
        });
        shape
    }

    /// The value side of a class: statics and construct signatures.
    fn ctor_shape(&self, name: &str, visiting: &mut Vec<String>) -> Option<ObjectShape> {
        if visiting.iter().any(|v| v == name) {
            return None;
        }
        let TypeDef::Class {
            type_params,
            statics,
            ctors,
            base,
            ..
        } = self.types.get(name)?
        else {
            return None;
        };

        visiting.push(name.to_string());
        let mut shape = match base {
            Some(Ty::Named { name: base, .. }) => self.ctor_shape(base, visiting).unwrap_or_default(),
            _ => ObjectShape::default(),
        };
        visiting.pop();
        shape.overlay(statics.clone());

        let instance = Ty::Named {
            name: name.to_string(),
            args: vec![Ty::Any; type_params.len()],
        };
        shape.constructs = if !ctors.is_empty() {
            ctors.iter().map(|sig| sig.substitute(type_params, &[])).collect()
        } else if shape.constructs.is_empty() {
            vec![Signature {
                params: Vec::new(),
                ret: instance,
            }]
        } else {
            shape
                .constructs
                .iter()
                .map(|sig| Signature {
                    ret: instance.clone(),
                    ..sig.clone()
                })
                .collect()
        };
        Some(shape)
    }

    /// Names of the declared interfaces and classes `name` directly
    /// extends.
    fn base_names(&self, name: &str) -> Vec<String> {
        let bases: Vec<&Ty> = match self.types.get(name) {
            Some(TypeDef::Interface { bases, .. }) => bases.iter().collect(),
            Some(TypeDef::Class { base, .. }) => base.iter().collect(),
            _ => Vec::new(),
        };
        bases
            .into_iter()
            .filter_map(|base| match base {
                Ty::Named { name, .. } if self.types.contains_key(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Iterates over declared value names.
    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterates over declared type names.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Span of a value or type declaration named `name`.
    #[must_use]
    pub fn declaration_span(&self, name: &str) -> Option<Span> {
        self.values
            .get(name)
            .map(|v| v.span)
            .or_else(|| self.types.get(name).map(Spanned::span))
    }
}

impl Spanned for TypeDef {
    fn span(&self) -> Span {
        match self {
            Self::Interface { span, .. } | Self::Class { span, .. } | Self::Alias { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyconform_syntax::parse_declarations;

    fn build(source: &str) -> (Catalog, Vec<CatalogDiagnostic>) {
        let file = parse_declarations(source).unwrap();
        Catalog::builder().file(&file).build()
    }

    fn catalog(source: &str) -> Catalog {
        let (catalog, errors) = build(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        catalog
    }

    #[test]
    fn test_function_overloads_collect() {
        let catalog = catalog(
            "declare function connect(port: number): Socket;\n\
             declare function connect(path: string): Socket;\n\
             interface Socket { write(data: string): boolean; }",
        );
        let Some(ValueDef {
            ty: Ty::Function(sigs), ..
        }) = catalog.value("connect")
        else {
            panic!("expected function");
        };
        assert_eq!(sigs.len(), 2);
        assert_eq!(sigs[1].params[0].ty, Ty::STRING);
    }

    #[test]
    fn test_interfaces_merge() {
        let catalog = catalog("interface A { x: number; }\ninterface A { y: string; }");
        let shape = catalog.shape_of(&Ty::named("A")).unwrap();
        assert!(shape.prop("x").is_some());
        assert!(shape.prop("y").is_some());
    }

    #[test]
    fn test_duplicate_alias_reported() {
        let (_, errors) = build("type A = string;\ntype A = number;");
        assert!(matches!(
            errors.as_slice(),
            [CatalogDiagnostic {
                file: 0,
                error: TypeError::DuplicateDeclaration { name, .. }
            }] if name == "A"
        ));
    }

    #[test]
    fn test_duplicate_variable_reported() {
        let (_, errors) = build("declare const a: string;\ndeclare const a: string;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error.kind(), "DuplicateDeclaration");
    }

    #[test]
    fn test_unknown_name_in_declaration() {
        let (catalog, errors) = build("declare function f(s: Sokcet): void;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error.kind(), "UnknownName");
        assert!(catalog.value("f").is_some());
    }

    #[test]
    fn test_names_resolve_across_files_and_order() {
        let first = parse_declarations("declare const w: Worker;").unwrap();
        let second = parse_declarations("interface Worker { id: number; }").unwrap();
        let (catalog, errors) = Catalog::builder().file(&first).file(&second).build();
        assert!(errors.is_empty());
        assert_eq!(catalog.value("w").unwrap().ty, Ty::named("Worker"));
    }

    #[test]
    fn test_errors_carry_file_index() {
        let first = parse_declarations("type A = string;").unwrap();
        let second = parse_declarations("type A = number;").unwrap();
        let (_, errors) = Catalog::builder().file(&first).file(&second).build();
        assert_eq!(errors[0].file, 1);
    }

    #[test]
    fn test_namespace_qualified_names() {
        let catalog = catalog(
            "declare namespace NodeJS {\n\
               interface Dict<T> { [key: string]: T | undefined; }\n\
               type Signals = \"SIGINT\" | \"SIGTERM\";\n\
               interface Holder { signal: Signals; }\n\
             }",
        );
        assert!(catalog.type_def("NodeJS.Dict").is_some());
        let holder = catalog.shape_of(&Ty::named("NodeJS.Holder")).unwrap();
        assert_eq!(holder.prop("signal").unwrap().ty, Ty::named("NodeJS.Signals"));

        let dict = Ty::Named {
            name: "NodeJS.Dict".into(),
            args: vec![Ty::NUMBER],
        };
        let shape = catalog.shape_of(&dict).unwrap();
        assert_eq!(shape.index, Some(Ty::union([Ty::NUMBER, Ty::UNDEFINED])));
    }

    #[test]
    fn test_interface_inherits_base_members() {
        let catalog = catalog(
            "interface EventEmitter { on(event: string, listener: () => void): this; }\n\
             interface Cluster extends EventEmitter { isPrimary: boolean; }",
        );
        let shape = catalog.shape_of(&Ty::named("Cluster")).unwrap();
        assert!(shape.prop("isPrimary").is_some());
        assert!(shape.prop("on").is_some());
    }

    #[test]
    fn test_derived_overloads_shadow_base() {
        let catalog = catalog(
            "declare class EventEmitter { on(event: string, listener: () => void): this; }\n\
             declare class Worker extends EventEmitter {\n\
               on(event: \"exit\", listener: () => void): this;\n\
               on(event: \"online\", listener: () => void): this;\n\
             }",
        );
        let shape = catalog.shape_of(&Ty::named("Worker")).unwrap();
        let Ty::Function(sigs) = &shape.prop("on").unwrap().ty else {
            panic!("expected method");
        };
        assert_eq!(sigs.len(), 2);
    }

    #[test]
    fn test_class_value_and_default_constructor() {
        let catalog = catalog("declare class Worker { id: number; static count: number; }");
        assert_eq!(catalog.value("Worker").unwrap().ty, Ty::ClassCtor("Worker".into()));
        let ctor = catalog.shape_of(&Ty::ClassCtor("Worker".into())).unwrap();
        assert!(ctor.prop("count").is_some());
        assert!(ctor.prop("id").is_none());
        assert_eq!(ctor.constructs.len(), 1);
        assert_eq!(ctor.constructs[0].ret, Ty::named("Worker"));
    }

    #[test]
    fn test_class_declared_constructor() {
        let catalog = catalog("declare class Worker { constructor(id: number); }");
        let ctor = catalog.shape_of(&Ty::ClassCtor("Worker".into())).unwrap();
        assert_eq!(ctor.constructs[0].params[0].ty, Ty::NUMBER);
        assert_eq!(ctor.constructs[0].ret, Ty::named("Worker"));
    }

    #[test]
    fn test_array_shape_from_declared_interface() {
        let catalog = catalog("interface Array<T> { length: number; pop(): T | undefined; }");
        let shape = catalog.shape_of(&Ty::Array(Box::new(Ty::STRING))).unwrap();
        let Ty::Function(sigs) = &shape.prop("pop").unwrap().ty else {
            panic!("expected method");
        };
        assert_eq!(sigs[0].ret, Ty::union([Ty::STRING, Ty::UNDEFINED]));
    }

    #[test]
    fn test_alias_expansion_and_canonical() {
        let catalog = catalog(
            "type SerializationType = \"json\" | \"advanced\";\n\
             type Maybe<T> = T | undefined;",
        );
        let expanded = catalog.expand_alias(&Ty::named("SerializationType"));
        assert_eq!(expanded, Ty::union([Ty::str_lit("json"), Ty::str_lit("advanced")]));

        let maybe = Ty::Named {
            name: "Maybe".into(),
            args: vec![Ty::named("SerializationType")],
        };
        assert_eq!(
            catalog.canonical(&maybe).to_string(),
            "\"advanced\" | \"json\" | undefined"
        );
    }

    #[test]
    fn test_cyclic_bases_terminate() {
        let (catalog, errors) = build("interface A extends B { a: number; }\ninterface B extends A { b: number; }");
        let shape = catalog.shape_of(&Ty::named("A")).unwrap();
        assert!(shape.prop("a").is_some());
        assert!(shape.prop("b").is_some());
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0].error,
            TypeError::CyclicBase { name, base, .. } if name == "B" && base == "A"
        ));
    }

    #[test]
    fn test_diamond_cycle_reported_per_clause() {
        let (catalog, errors) = build(
            "interface A extends B, C { a: number; }\n\
             interface B extends A { b: number; }\n\
             interface C extends A { c: number; }",
        );
        let kinds: Vec<&str> = errors.iter().map(|d| d.error.kind()).collect();
        assert_eq!(kinds, ["CyclicBase", "CyclicBase"]);

        let shape = catalog.shape_of(&Ty::named("A")).unwrap();
        for name in ["a", "b", "c"] {
            assert!(shape.prop(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_acyclic_bases_not_reported() {
        let (_, errors) = build(
            "interface Base { id: number; }\n\
             interface Left extends Base {}\n\
             interface Right extends Base {}\n\
             interface Both extends Left, Right {}",
        );
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_recursive_alias_expands_one_level() {
        let catalog = catalog("type T = { a: T; b: T; c: T };");
        let canonical = catalog.canonical(&Ty::named("T")).to_string();
        assert_eq!(canonical, "{ a: T; b: T; c: T }");
    }

    #[test]
    fn test_recursive_json_alias() {
        let catalog = catalog("type Json = string | Json[] | { [k: string]: Json };");
        let canonical = catalog.canonical(&Ty::named("Json"));
        let rendered = canonical.to_string();
        assert!(rendered.contains("Json[]"), "{rendered}");
        assert!(rendered.contains("string"), "{rendered}");
    }

    #[test]
    fn test_mutually_recursive_aliases() {
        let catalog = catalog("type A = { next: B };\ntype B = { prev: A } | undefined;");
        let rendered = catalog.canonical(&Ty::named("A")).to_string();
        assert!(rendered.contains("prev: A"), "{rendered}");
    }
}
