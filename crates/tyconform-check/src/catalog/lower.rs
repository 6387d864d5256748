//! Lowering of written type annotations into [`Ty`].

use crate::error::TypeError;
use crate::types::{Lit, ObjectShape, ParamTy, PrimTy, PropTy, Signature, Ty};
use tyconform_syntax::ast::{self, KeywordType, Member, TypeExpr};

/// Resolves names and lowers `TypeExpr`s.
///
/// Names resolve against the enclosing namespaces, innermost first, then
/// against the top level. Type parameters of the declaration being lowered
/// become [`Ty::Param`]; type parameters of a method are erased to `any`.
pub(crate) struct Lowerer<'a> {
    is_type: &'a dyn Fn(&str) -> bool,
    scope: Vec<String>,
    params: Vec<String>,
    erased: Vec<Vec<String>>,
    pub(crate) errors: Vec<TypeError>,
}

impl<'a> Lowerer<'a> {
    pub(crate) fn new(is_type: &'a dyn Fn(&str) -> bool) -> Self {
        Self {
            is_type,
            scope: Vec::new(),
            params: Vec::new(),
            erased: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn enter_namespace(&mut self, name: &str) {
        self.scope.push(name.to_string());
    }

    pub(crate) fn exit_namespace(&mut self) {
        self.scope.pop();
    }

    /// Qualified name for a declaration in the current namespace.
    pub(crate) fn qualify(&self, name: &str) -> String {
        if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{name}", self.scope.join("."))
        }
    }

    pub(crate) fn set_type_params(&mut self, params: &[ast::Ident]) {
        self.params = params.iter().map(|p| p.name.clone()).collect();
    }

    /// Finds the qualified name `name` refers to.
    pub(crate) fn resolve_name(&self, name: &str) -> Option<String> {
        for depth in (0..=self.scope.len()).rev() {
            let candidate = if depth == 0 {
                name.to_string()
            } else {
                format!("{}.{name}", self.scope[..depth].join("."))
            };
            if (self.is_type)(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    pub(crate) fn lower(&mut self, ty: &TypeExpr) -> Ty {
        match ty {
            TypeExpr::Keyword { kind, .. } => match kind {
                KeywordType::String => Ty::STRING,
                KeywordType::Number => Ty::NUMBER,
                KeywordType::Boolean => Ty::BOOLEAN,
                KeywordType::Void => Ty::VOID,
                KeywordType::Undefined => Ty::UNDEFINED,
                KeywordType::Null => Ty::NULL,
                KeywordType::Object => Ty::Primitive(PrimTy::Object),
                KeywordType::Any => Ty::Any,
                KeywordType::Unknown => Ty::Unknown,
                KeywordType::Never => Ty::Never,
                KeywordType::This => Ty::This,
            },
            TypeExpr::StringLit { value, .. } => Ty::Literal(Lit::Str(value.clone())),
            TypeExpr::NumberLit { value, .. } => Ty::Literal(Lit::Num(*value)),
            TypeExpr::BoolLit { value, .. } => Ty::Literal(Lit::Bool(*value)),
            TypeExpr::Array { elem, .. } => Ty::Array(Box::new(self.lower(elem))),
            TypeExpr::Union { members, .. } => Ty::union(members.iter().map(|m| self.lower(m))),
            TypeExpr::Function { sig, .. } => Ty::Function(vec![self.lower_signature(sig)]),
            TypeExpr::Object { members, .. } => Ty::Object(Box::new(self.lower_members(members).0)),
            TypeExpr::Ref { path, args, span } => {
                let name = TypeExpr::ref_name(path);
                let args: Vec<Ty> = args.iter().map(|a| self.lower(a)).collect();
                self.lower_ref(name, args, *span)
            }
        }
    }

    fn lower_ref(&mut self, name: String, args: Vec<Ty>, span: tyconform_syntax::Span) -> Ty {
        if args.is_empty() {
            if self.erased.iter().any(|frame| frame.contains(&name)) {
                return Ty::Any;
            }
            if self.params.contains(&name) {
                return Ty::Param(name);
            }
        }

        if let Some(qualified) = self.resolve_name(&name) {
            if qualified == "Array" || qualified == "ReadonlyArray" {
                return Ty::Array(Box::new(args.into_iter().next().unwrap_or(Ty::Any)));
            }
            return Ty::Named { name: qualified, args };
        }

        match name.as_str() {
            "Array" | "ReadonlyArray" => Ty::Array(Box::new(args.into_iter().next().unwrap_or(Ty::Any))),
            "Function" => Ty::Function(vec![Signature {
                params: vec![ParamTy {
                    name: "args".to_string(),
                    ty: Ty::Array(Box::new(Ty::Any)),
                    optional: false,
                    rest: true,
                }],
                ret: Ty::Any,
            }]),
            _ => {
                self.errors.push(TypeError::UnknownName { name, span });
                Ty::Error
            }
        }
    }

    pub(crate) fn lower_signature(&mut self, sig: &ast::Signature) -> Signature {
        self.erased
            .push(sig.type_params.iter().map(|p| p.name.clone()).collect());
        let params = sig
            .params
            .iter()
            .map(|p| ParamTy {
                name: p.name.name.clone(),
                ty: match &p.ty {
                    Some(ty) => self.lower(ty),
                    None if p.rest => Ty::Array(Box::new(Ty::Any)),
                    None => Ty::Any,
                },
                optional: p.optional,
                rest: p.rest,
            })
            .collect();
        let ret = sig.ret.as_ref().map_or(Ty::Any, |ret| self.lower(ret));
        self.erased.pop();
        Signature { params, ret }
    }

    /// Lowers a member list into instance members and static members.
    pub(crate) fn lower_members(&mut self, members: &[Member]) -> (ObjectShape, ObjectShape) {
        let mut shape = ObjectShape::default();
        let mut statics = ObjectShape::default();

        for member in members {
            match member {
                Member::Property {
                    name,
                    optional,
                    readonly,
                    is_static,
                    ty,
                    ..
                } => {
                    let prop = PropTy {
                        name: name.name.clone(),
                        ty: ty.as_ref().map_or(Ty::Any, |ty| self.lower(ty)),
                        optional: *optional,
                        readonly: *readonly,
                    };
                    let target = if *is_static { &mut statics } else { &mut shape };
                    target.insert(prop);
                }
                Member::Method {
                    name,
                    optional,
                    is_static,
                    sig,
                    ..
                } => {
                    let prop = PropTy {
                        name: name.name.clone(),
                        ty: Ty::Function(vec![self.lower_signature(sig)]),
                        optional: *optional,
                        readonly: false,
                    };
                    let target = if *is_static { &mut statics } else { &mut shape };
                    target.insert(prop);
                }
                Member::Index { value, .. } => shape.index = Some(self.lower(value)),
                Member::Call { sig, .. } => {
                    let sig = self.lower_signature(sig);
                    shape.calls.push(sig);
                }
                Member::Construct { sig, .. } => {
                    let sig = self.lower_signature(sig);
                    shape.constructs.push(sig);
                }
            }
        }

        (shape, statics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tyconform_syntax::parse_type;

    fn lower_with(names: &[&str], scope: &[&str], source: &str) -> (Ty, Vec<TypeError>) {
        let is_type = |name: &str| names.contains(&name);
        let mut lowerer = Lowerer::new(&is_type);
        for ns in scope {
            lowerer.enter_namespace(ns);
        }
        let ty = lowerer.lower(&parse_type(source).unwrap());
        (ty, lowerer.errors)
    }

    #[test]
    fn test_resolves_innermost_namespace_first() {
        let (ty, errors) = lower_with(&["Dict", "NodeJS.Dict"], &["NodeJS"], "Dict<string>");
        assert!(errors.is_empty());
        assert_eq!(
            ty,
            Ty::Named {
                name: "NodeJS.Dict".into(),
                args: vec![Ty::STRING]
            }
        );
    }

    #[test]
    fn test_dotted_reference() {
        let (ty, _) = lower_with(&["NodeJS.Dict", "Worker"], &[], "NodeJS.Dict<Worker>");
        assert_eq!(ty.to_string(), "NodeJS.Dict<Worker>");
    }

    #[test]
    fn test_array_generic_is_array_type() {
        let (ty, errors) = lower_with(&["Array"], &[], "Array<string>");
        assert!(errors.is_empty());
        assert_eq!(ty, Ty::Array(Box::new(Ty::STRING)));
        let (ty, _) = lower_with(&[], &[], "ReadonlyArray<number>");
        assert_eq!(ty, Ty::Array(Box::new(Ty::NUMBER)));
    }

    #[test]
    fn test_unknown_name_reported() {
        let (ty, errors) = lower_with(&[], &[], "Sockett | undefined");
        assert_eq!(ty, Ty::Error);
        assert!(matches!(
            errors.as_slice(),
            [TypeError::UnknownName { name, .. }] if name == "Sockett"
        ));
    }

    #[test]
    fn test_method_type_params_erased() {
        let is_type = |_: &str| false;
        let mut lowerer = Lowerer::new(&is_type);
        let Ok(TypeExpr::Function { sig, .. }) = parse_type("<T>(value: T) => T") else {
            panic!("expected function type");
        };
        let sig = lowerer.lower_signature(&sig);
        assert!(lowerer.errors.is_empty());
        assert_eq!(sig.params[0].ty, Ty::Any);
        assert_eq!(sig.ret, Ty::Any);
    }

    #[test]
    fn test_declaration_type_params() {
        let is_type = |_: &str| false;
        let mut lowerer = Lowerer::new(&is_type);
        lowerer.set_type_params(&[ast::Ident::new("T", tyconform_syntax::Span::default())]);
        let ty = lowerer.lower(&parse_type("T | undefined").unwrap());
        assert_eq!(ty, Ty::union([Ty::Param("T".into()), Ty::UNDEFINED]));
    }
}
