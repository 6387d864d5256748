//! Assignability between types.
//!
//! Object-like types compare structurally. Named types are expanded on
//! demand through the catalog, so recursive interfaces are handled by
//! remembering the pairs currently being compared and assuming they hold.

use crate::catalog::{Catalog, TypeDef};
use crate::types::{Lit, ObjectShape, PrimTy, Signature, Ty};
use hashbrown::HashSet;
use tyconform_log::trace;

const MAX_DEPTH: usize = 64;

/// Whether a value of type `source` may be used where `target` is expected.
///
/// ```
/// use tyconform_check::{is_assignable, Catalog};
/// use tyconform_check::types::Ty;
///
/// let catalog = Catalog::default();
/// assert!(is_assignable(&catalog, &Ty::str_lit("json"), &Ty::STRING));
/// assert!(!is_assignable(&catalog, &Ty::STRING, &Ty::str_lit("json")));
/// assert!(is_assignable(&catalog, &Ty::UNDEFINED, &Ty::union([Ty::NUMBER, Ty::UNDEFINED])));
/// ```
#[must_use]
pub fn is_assignable(catalog: &Catalog, source: &Ty, target: &Ty) -> bool {
    Relation::new(catalog).assignable(source, target)
}

/// One assignability query with its coinductive assumptions.
pub(crate) struct Relation<'cat> {
    catalog: &'cat Catalog,
    assumed: HashSet<String>,
    depth: usize,
}

impl<'cat> Relation<'cat> {
    pub(crate) fn new(catalog: &'cat Catalog) -> Self {
        Self {
            catalog,
            assumed: HashSet::new(),
            depth: 0,
        }
    }

    pub(crate) fn assignable(&mut self, source: &Ty, target: &Ty) -> bool {
        if self.depth > MAX_DEPTH {
            return true;
        }
        self.depth += 1;
        let result = self.assignable_inner(source, target);
        self.depth -= 1;
        result
    }

    fn assignable_inner(&mut self, source: &Ty, target: &Ty) -> bool {
        if source == target {
            return true;
        }

        match (source, target) {
            (Ty::Any | Ty::Error | Ty::Never | Ty::This | Ty::Param(_), _) => return true,
            (_, Ty::Any | Ty::Error | Ty::Unknown | Ty::This | Ty::Param(_)) => return true,
            (_, Ty::Never) | (Ty::Unknown, _) => return false,
            _ => {}
        }

        if let Some(expanded) = self.expand(source) {
            return self.assignable(&expanded, target);
        }
        if let Some(expanded) = self.expand(target) {
            return self.assignable(source, &expanded);
        }

        match (source, target) {
            (Ty::Union(members), _) => members.iter().all(|m| self.assignable(m, target)),

            (Ty::Primitive(PrimTy::Boolean), Ty::Union(members))
                if members.contains(&Ty::Literal(Lit::Bool(true)))
                    && members.contains(&Ty::Literal(Lit::Bool(false))) =>
            {
                true
            }

            (_, Ty::Union(members)) => members.iter().any(|m| self.assignable(source, m)),

            (Ty::Literal(a), Ty::Literal(b)) => a == b,
            (Ty::Literal(lit), Ty::Primitive(prim)) => lit.base() == *prim,
            (Ty::Primitive(PrimTy::Undefined), Ty::Primitive(PrimTy::Void)) => true,
            (Ty::Primitive(a), Ty::Primitive(b)) if a == b => true,

            (Ty::Array(s), Ty::Array(t)) => self.assignable(s, t),

            (_, Ty::Primitive(PrimTy::Object)) => matches!(
                source,
                Ty::Array(_) | Ty::Function(_) | Ty::Object(_) | Ty::Named { .. } | Ty::ClassCtor(_)
            ),

            (Ty::Function(s), Ty::Function(t)) => self.signatures_assignable(s, t),

            (
                Ty::Named {
                    name: s_name,
                    args: s_args,
                },
                Ty::Named {
                    name: t_name,
                    args: t_args,
                },
            ) if s_name == t_name
                && s_args.len() == t_args.len()
                && s_args.iter().zip(t_args).all(|(s, t)| self.assignable(s, t)) =>
            {
                true
            }

            (_, Ty::Function(t)) => match self.catalog.shape_of(source) {
                Some(shape) => self.signatures_assignable(&shape.calls, t),
                None => false,
            },

            (_, Ty::Named { .. } | Ty::Object(_) | Ty::Array(_) | Ty::ClassCtor(_)) => self.structural(source, target),

            _ => false,
        }
    }

    /// The aliased type when `ty` names an alias.
    fn expand(&self, ty: &Ty) -> Option<Ty> {
        match ty {
            Ty::Named { name, .. } => match self.catalog.type_def(name) {
                Some(TypeDef::Alias { .. }) => Some(self.catalog.expand_alias(ty)),
                _ => None,
            },
            _ => None,
        }
    }

    fn structural(&mut self, source: &Ty, target: &Ty) -> bool {
        if matches!(source, Ty::Primitive(PrimTy::Null | PrimTy::Undefined | PrimTy::Void)) {
            return false;
        }

        let key = format!("{source}\u{0}{target}");
        if !self.assumed.insert(key.clone()) {
            return true;
        }

        let result = match (self.catalog.shape_of(source), self.catalog.shape_of(target)) {
            (Some(s), Some(t)) => self.shapes_assignable(&s, &t),
            _ => false,
        };
        trace!(%source, %target, result, "structural comparison");

        if !result {
            self.assumed.remove(&key);
        }
        result
    }

    fn shapes_assignable(&mut self, source: &ObjectShape, target: &ObjectShape) -> bool {
        for t_prop in &target.props {
            match source.prop(&t_prop.name) {
                None if t_prop.optional => {}
                None => return false,
                Some(s_prop) => {
                    if s_prop.optional && !t_prop.optional {
                        return false;
                    }
                    let s_ty = s_prop.read_ty();
                    let t_ty = t_prop.read_ty();
                    if !self.assignable(&s_ty, &t_ty) {
                        return false;
                    }
                }
            }
        }

        if let Some(index) = &target.index {
            for s_prop in &source.props {
                if !self.assignable(&s_prop.ty, index) {
                    return false;
                }
            }
            if let Some(s_index) = &source.index {
                if !self.assignable(s_index, index) {
                    return false;
                }
            }
        }

        if !target.calls.is_empty() && !self.signatures_assignable(&source.calls, &target.calls) {
            return false;
        }
        if !target.constructs.is_empty() && !self.signatures_assignable(&source.constructs, &target.constructs) {
            return false;
        }
        true
    }

    /// Every target signature must be satisfied by some source signature.
    fn signatures_assignable(&mut self, source: &[Signature], target: &[Signature]) -> bool {
        target
            .iter()
            .all(|t| source.iter().any(|s| self.signature_assignable(s, t)))
    }

    fn signature_assignable(&mut self, source: &Signature, target: &Signature) -> bool {
        if !target.has_rest() && source.required() > target.params.len() {
            return false;
        }

        for index in 0..source.params.len() {
            let Some((_, s_ty)) = source.param_for(index) else {
                break;
            };
            let Some((_, t_ty)) = target.param_for(index) else {
                break;
            };
            if !self.assignable(&t_ty, &s_ty) {
                return false;
            }
        }

        target.ret == Ty::VOID || self.assignable(&source.ret, &target.ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamTy, PropTy};
    use tyconform_syntax::parse_declarations;

    fn catalog(source: &str) -> Catalog {
        let file = parse_declarations(source).unwrap();
        let (catalog, errors) = Catalog::builder().file(&file).build();
        assert!(errors.is_empty(), "{errors:?}");
        catalog
    }

    fn sig(params: &[(&str, Ty, bool)], ret: Ty) -> Ty {
        Ty::Function(vec![Signature {
            params: params
                .iter()
                .map(|(name, ty, optional)| ParamTy {
                    name: (*name).to_string(),
                    ty: ty.clone(),
                    optional: *optional,
                    rest: false,
                })
                .collect(),
            ret,
        }])
    }

    fn object(props: &[(&str, Ty, bool)]) -> Ty {
        Ty::Object(Box::new(ObjectShape {
            props: props
                .iter()
                .map(|(name, ty, optional)| PropTy {
                    name: (*name).to_string(),
                    ty: ty.clone(),
                    optional: *optional,
                    readonly: false,
                })
                .collect(),
            ..ObjectShape::default()
        }))
    }

    #[test]
    fn test_top_and_bottom_types() {
        let catalog = Catalog::default();
        assert!(is_assignable(&catalog, &Ty::NUMBER, &Ty::Any));
        assert!(is_assignable(&catalog, &Ty::Any, &Ty::NUMBER));
        assert!(is_assignable(&catalog, &Ty::NUMBER, &Ty::Unknown));
        assert!(!is_assignable(&catalog, &Ty::Unknown, &Ty::NUMBER));
        assert!(is_assignable(&catalog, &Ty::Never, &Ty::STRING));
        assert!(!is_assignable(&catalog, &Ty::STRING, &Ty::Never));
    }

    #[test]
    fn test_primitives_and_literals() {
        let catalog = Catalog::default();
        assert!(!is_assignable(&catalog, &Ty::NUMBER, &Ty::STRING));
        assert!(is_assignable(&catalog, &Ty::UNDEFINED, &Ty::VOID));
        assert!(!is_assignable(&catalog, &Ty::VOID, &Ty::UNDEFINED));
        assert!(is_assignable(&catalog, &Ty::Literal(Lit::Num(1.0)), &Ty::NUMBER));
        assert!(!is_assignable(&catalog, &Ty::str_lit("xml"), &Ty::str_lit("json")));
    }

    #[test]
    fn test_unions() {
        let catalog = Catalog::default();
        let serialization = Ty::union([Ty::str_lit("json"), Ty::str_lit("advanced")]);
        assert!(is_assignable(&catalog, &Ty::str_lit("advanced"), &serialization));
        assert!(!is_assignable(&catalog, &Ty::str_lit("xml"), &serialization));
        assert!(!is_assignable(&catalog, &serialization, &Ty::str_lit("json")));
        assert!(is_assignable(&catalog, &serialization, &Ty::STRING));

        let flag = Ty::union([Ty::Literal(Lit::Bool(true)), Ty::Literal(Lit::Bool(false))]);
        assert!(is_assignable(&catalog, &Ty::BOOLEAN, &flag));
    }

    #[test]
    fn test_alias_expansion() {
        let catalog = catalog("type SerializationType = \"json\" | \"advanced\";");
        let alias = Ty::named("SerializationType");
        assert!(is_assignable(&catalog, &Ty::str_lit("json"), &alias));
        assert!(!is_assignable(&catalog, &Ty::str_lit("xml"), &alias));
    }

    #[test]
    fn test_arrays() {
        let catalog = Catalog::default();
        let strings = Ty::Array(Box::new(Ty::STRING));
        assert!(is_assignable(&catalog, &Ty::Array(Box::new(Ty::str_lit("--inspect"))), &strings));
        assert!(!is_assignable(&catalog, &Ty::Array(Box::new(Ty::NUMBER)), &strings));
        assert!(is_assignable(&catalog, &strings, &Ty::Primitive(PrimTy::Object)));
        assert!(!is_assignable(&catalog, &Ty::STRING, &Ty::Primitive(PrimTy::Object)));
    }

    #[test]
    fn test_functions() {
        let catalog = Catalog::default();
        let callback = sig(&[("error", Ty::union([Ty::named("Error"), Ty::NULL]), false)], Ty::VOID);

        // fewer parameters are fine
        assert!(is_assignable(&catalog, &sig(&[], Ty::VOID), &callback));
        // non-void result accepted by a void target
        assert!(is_assignable(&catalog, &sig(&[], Ty::NUMBER), &callback));
        // more required parameters than the target provides
        let two = sig(&[("a", Ty::Any, false), ("b", Ty::Any, false)], Ty::VOID);
        assert!(!is_assignable(&catalog, &two, &callback));
        // parameter types are compared target to source
        let wants_string = sig(&[("error", Ty::STRING, false)], Ty::VOID);
        assert!(!is_assignable(&catalog, &wants_string, &callback));
    }

    #[test]
    fn test_object_literal_against_interface() {
        let catalog = catalog(
            "interface NetConnectOpts { port: number; host?: string; }",
        );
        let target = Ty::named("NetConnectOpts");
        assert!(is_assignable(&catalog, &object(&[("port", Ty::NUMBER, false)]), &target));
        assert!(!is_assignable(&catalog, &object(&[("host", Ty::STRING, false)]), &target));
        assert!(!is_assignable(
            &catalog,
            &object(&[("port", Ty::NUMBER, false), ("host", Ty::NUMBER, false)]),
            &target
        ));
    }

    #[test]
    fn test_index_signature_target() {
        let catalog = catalog("interface Dict<T> { [key: string]: T | undefined; }");
        let target = Ty::Named {
            name: "Dict".into(),
            args: vec![Ty::NUMBER],
        };
        assert!(is_assignable(&catalog, &object(&[("a", Ty::NUMBER, false)]), &target));
        assert!(!is_assignable(&catalog, &object(&[("a", Ty::STRING, false)]), &target));
    }

    #[test]
    fn test_class_instance_structural_and_recursive() {
        let catalog = catalog(
            "declare class Worker { id: number; disconnect(): Worker; }\n\
             interface HasId { id: number; disconnect(): HasId; }",
        );
        assert!(is_assignable(&catalog, &Ty::named("Worker"), &Ty::named("HasId")));
        assert!(!is_assignable(&catalog, &Ty::NULL, &Ty::named("HasId")));
    }

    #[test]
    fn test_named_generic_arguments() {
        let catalog = catalog("interface Dict<T> { [key: string]: T | undefined; }");
        let dict = |arg: Ty| Ty::Named {
            name: "Dict".into(),
            args: vec![arg],
        };
        assert!(is_assignable(&catalog, &dict(Ty::str_lit("a")), &dict(Ty::STRING)));
    }
}
