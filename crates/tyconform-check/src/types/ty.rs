//! Core type representation for checking.
//!
//! `Ty` is the checker's view of a type. It is distinct from
//! `tyconform_syntax::ast::TypeExpr`, which is the annotation as written:
//! names are resolved against the catalog, method-level type parameters are
//! erased to `any`, and named types stay lazy (`Ty::Named`) until something
//! needs their structure.
//!
//! # Design
//!
//! - **Primitives** are the built-in keyword types
//! - **Literals** are string, number and boolean literal types
//! - **Named** types refer to catalog interfaces, classes and aliases
//! - **Special types** like `This`, `Param` and `Error` only appear while a
//!   declaration is being instantiated or after an error

/// Internal type representation for checking.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    /// Built-in keyword type: `string`, `void`, `object`, ...
    Primitive(PrimTy),

    /// Literal type: `"advanced"`, `1`, `true`
    Literal(Lit),

    /// `any`: assignable to and from everything
    Any,

    /// `unknown`: everything is assignable to it
    Unknown,

    /// `never`: assignable to everything, nothing is assignable to it
    Never,

    /// `T[]`
    Array(Box<Ty>),

    /// `A | B`; built with [`Ty::union`] so it is flat and deduplicated
    Union(Vec<Ty>),

    /// Callable value; more than one signature means overloads.
    Function(Vec<Signature>),

    /// Anonymous object type, from type literals and object expressions.
    Object(Box<ObjectShape>),

    /// Catalog interface, class or alias, with type arguments.
    Named {
        /// Qualified name (`NodeJS.Dict`)
        name: String,
        /// Type arguments
        args: Vec<Ty>,
    },

    /// The value of a class name: `typeof Worker`.
    ClassCtor(String),

    /// Type parameter of the declaration being lowered.
    Param(String),

    /// Polymorphic `this`, replaced by the receiver on member access.
    This,

    /// Result of a failed check. Compatible with everything so one mistake
    /// reports once.
    Error,
}

/// Built-in keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimTy {
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `void`
    Void,
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `object`
    Object,
}

/// Literal types.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    /// `"json"`
    Str(String),
    /// `1`
    Num(f64),
    /// `true`
    Bool(bool),
}

impl Lit {
    /// The primitive a literal widens to.
    #[must_use]
    pub const fn base(&self) -> PrimTy {
        match self {
            Self::Str(_) => PrimTy::String,
            Self::Num(_) => PrimTy::Number,
            Self::Bool(_) => PrimTy::Boolean,
        }
    }
}

/// One call signature.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    /// Parameters in order
    pub params: Vec<ParamTy>,
    /// Return type
    pub ret: Ty,
}

impl Signature {
    /// Number of parameters a call must supply.
    #[must_use]
    pub fn required(&self) -> usize {
        self.params.iter().filter(|p| !p.optional && !p.rest).count()
    }

    /// Whether the last parameter is `...rest`.
    #[must_use]
    pub fn has_rest(&self) -> bool {
        self.params.last().is_some_and(|p| p.rest)
    }

    /// Whether `count` arguments can satisfy this signature's arity.
    #[must_use]
    pub fn accepts_arity(&self, count: usize) -> bool {
        count >= self.required() && (self.has_rest() || count <= self.params.len())
    }

    /// Human readable arity: `1`, `1-3`, `2+`.
    #[must_use]
    pub fn arity_label(&self) -> String {
        let required = self.required();
        if self.has_rest() {
            format!("{required}+")
        } else if required == self.params.len() {
            required.to_string()
        } else {
            format!("{required}-{}", self.params.len())
        }
    }

    /// Type of the parameter that receives argument `index`, if any.
    #[must_use]
    pub fn param_for(&self, index: usize) -> Option<(&ParamTy, Ty)> {
        match self.params.get(index) {
            Some(param) if param.rest => Some((param, param.ty.element())),
            Some(param) => Some((param, param.ty.clone())),
            None => {
                let last = self.params.last().filter(|p| p.rest)?;
                Some((last, last.ty.element()))
            }
        }
    }

    /// Replaces type parameters inside the signature.
    #[must_use]
    pub fn substitute(&self, params: &[String], args: &[Ty]) -> Signature {
        self.map(&mut |ty| ty.substitute(params, args))
    }

    fn map(&self, f: &mut impl FnMut(&Ty) -> Ty) -> Self {
        Self {
            params: self
                .params
                .iter()
                .map(|p| ParamTy {
                    ty: f(&p.ty),
                    ..p.clone()
                })
                .collect(),
            ret: f(&self.ret),
        }
    }
}

/// A signature parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamTy {
    /// Parameter name, used in diagnostics
    pub name: String,
    /// Declared type; for rest parameters the array type
    pub ty: Ty,
    /// `name?`
    pub optional: bool,
    /// `...name`
    pub rest: bool,
}

/// A property or method of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct PropTy {
    /// Property name
    pub name: String,
    /// Property type; methods are `Ty::Function`
    pub ty: Ty,
    /// `name?`
    pub optional: bool,
    /// `readonly name`
    pub readonly: bool,
}

impl PropTy {
    /// Type seen when reading the property: optional properties may be
    /// `undefined`.
    #[must_use]
    pub fn read_ty(&self) -> Ty {
        if self.optional {
            Ty::union([self.ty.clone(), Ty::Primitive(PrimTy::Undefined)])
        } else {
            self.ty.clone()
        }
    }
}

/// Structure of an object-like type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    /// Properties and methods in declaration order
    pub props: Vec<PropTy>,
    /// `[key: string]: T`
    pub index: Option<Ty>,
    /// `(params): R`
    pub calls: Vec<Signature>,
    /// `new (params): R`
    pub constructs: Vec<Signature>,
}

impl ObjectShape {
    /// Looks up a property by name.
    #[must_use]
    pub fn prop(&self, name: &str) -> Option<&PropTy> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Adds a property, folding repeated methods into overloads and letting
    /// later properties replace earlier ones.
    pub fn insert(&mut self, prop: PropTy) {
        match self.props.iter_mut().find(|p| p.name == prop.name) {
            Some(existing) => match (&mut existing.ty, prop.ty) {
                (Ty::Function(sigs), Ty::Function(more)) => sigs.extend(more),
                (slot, ty) => {
                    *slot = ty;
                    existing.optional = prop.optional;
                    existing.readonly = prop.readonly;
                }
            },
            None => self.props.push(prop),
        }
    }

    /// Overlays `other` on `self`: same-named members of `other` shadow
    /// those of `self` instead of adding overloads.
    pub fn overlay(&mut self, other: ObjectShape) {
        for prop in other.props {
            self.props.retain(|p| p.name != prop.name);
            self.props.push(prop);
        }
        if other.index.is_some() {
            self.index = other.index;
        }
        if !other.calls.is_empty() {
            self.calls = other.calls;
        }
        if !other.constructs.is_empty() {
            self.constructs = other.constructs;
        }
    }

    /// Appends the members of another declaration of the same interface.
    pub fn merge(&mut self, other: ObjectShape) {
        for prop in other.props {
            self.insert(prop);
        }
        if other.index.is_some() {
            self.index = other.index;
        }
        self.calls.extend(other.calls);
        self.constructs.extend(other.constructs);
    }

    fn map(&self, f: &mut impl FnMut(&Ty) -> Ty) -> Self {
        Self {
            props: self
                .props
                .iter()
                .map(|p| PropTy {
                    ty: f(&p.ty),
                    ..p.clone()
                })
                .collect(),
            index: self.index.as_ref().map(&mut *f),
            calls: self.calls.iter().map(|s| s.map(f)).collect(),
            constructs: self.constructs.iter().map(|s| s.map(f)).collect(),
        }
    }
}

impl Ty {
    /// `string`
    pub const STRING: Ty = Ty::Primitive(PrimTy::String);
    /// `number`
    pub const NUMBER: Ty = Ty::Primitive(PrimTy::Number);
    /// `boolean`
    pub const BOOLEAN: Ty = Ty::Primitive(PrimTy::Boolean);
    /// `void`
    pub const VOID: Ty = Ty::Primitive(PrimTy::Void);
    /// `undefined`
    pub const UNDEFINED: Ty = Ty::Primitive(PrimTy::Undefined);
    /// `null`
    pub const NULL: Ty = Ty::Primitive(PrimTy::Null);

    /// Reference to a catalog type without arguments.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// String literal type.
    #[must_use]
    pub fn str_lit(value: impl Into<String>) -> Self {
        Self::Literal(Lit::Str(value.into()))
    }

    /// Builds a union: nested unions are flattened, duplicates and `never`
    /// dropped, `any` absorbs everything. One member is returned as-is and
    /// no members give `never`.
    ///
    /// ```
    /// use tyconform_check::types::Ty;
    ///
    /// let ty = Ty::union([Ty::STRING, Ty::union([Ty::UNDEFINED, Ty::STRING])]);
    /// assert_eq!(ty, Ty::Union(vec![Ty::STRING, Ty::UNDEFINED]));
    /// assert_eq!(Ty::union([Ty::NUMBER]), Ty::NUMBER);
    /// ```
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = Ty>) -> Self {
        let mut flat: Vec<Ty> = Vec::new();
        for member in members {
            match member {
                Self::Union(inner) => {
                    for ty in inner {
                        if !flat.contains(&ty) {
                            flat.push(ty);
                        }
                    }
                }
                Self::Never => {}
                Self::Any | Self::Error => return member,
                ty => {
                    if !flat.contains(&ty) {
                        flat.push(ty);
                    }
                }
            }
        }
        match flat.len() {
            0 => Self::Never,
            1 => flat.remove(0),
            _ => Self::Union(flat),
        }
    }

    /// Members of a union, or the type itself.
    #[must_use]
    pub fn members(&self) -> &[Ty] {
        match self {
            Self::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }

    /// `null`, `undefined` or `void`.
    #[must_use]
    pub const fn is_nullish(&self) -> bool {
        matches!(
            self,
            Self::Primitive(PrimTy::Null | PrimTy::Undefined | PrimTy::Void)
        )
    }

    /// Whether any member of the type is nullish.
    #[must_use]
    pub fn is_possibly_nullish(&self) -> bool {
        self.members().iter().any(Ty::is_nullish)
    }

    /// Removes `null` and `undefined` members, as `x!` does.
    ///
    /// ```
    /// use tyconform_check::types::Ty;
    ///
    /// let ty = Ty::union([Ty::named("Worker"), Ty::UNDEFINED]);
    /// assert_eq!(ty.non_nullish(), Ty::named("Worker"));
    /// ```
    #[must_use]
    pub fn non_nullish(&self) -> Ty {
        match self {
            Self::Union(members) => Ty::union(members.iter().filter(|m| !m.is_nullish()).cloned()),
            ty if ty.is_nullish() => Ty::Never,
            ty => ty.clone(),
        }
    }

    /// Nullish members only.
    #[must_use]
    pub fn nullish_part(&self) -> Ty {
        Ty::union(self.members().iter().filter(|m| m.is_nullish()).cloned())
    }

    /// Widens literal types to their primitives, as a mutable binding does.
    #[must_use]
    pub fn widen(&self) -> Ty {
        match self {
            Self::Literal(lit) => Ty::Primitive(lit.base()),
            Self::Union(members) => Ty::union(members.iter().map(Ty::widen)),
            ty => ty.clone(),
        }
    }

    /// Element type of an array, `any` for anything else.
    #[must_use]
    pub fn element(&self) -> Ty {
        match self {
            Self::Array(elem) => (**elem).clone(),
            _ => Ty::Any,
        }
    }

    /// Whether this is `any` or the error type.
    #[must_use]
    pub const fn is_any_like(&self) -> bool {
        matches!(self, Self::Any | Self::Error)
    }

    /// Whether an error occurred anywhere in this type.
    #[must_use]
    pub fn contains_error(&self) -> bool {
        match self {
            Self::Error => true,
            Self::Array(elem) => elem.contains_error(),
            Self::Union(members) => members.iter().any(Ty::contains_error),
            _ => false,
        }
    }

    /// Applies `f` to every directly nested type.
    pub(crate) fn map_children(&self, f: &mut impl FnMut(&Ty) -> Ty) -> Ty {
        match self {
            Self::Array(elem) => Self::Array(Box::new(f(elem))),
            Self::Union(members) => Ty::union(members.iter().map(&mut *f)),
            Self::Function(sigs) => Self::Function(sigs.iter().map(|s| s.map(f)).collect()),
            Self::Object(shape) => Self::Object(Box::new(shape.map(f))),
            Self::Named { name, args } => Self::Named {
                name: name.clone(),
                args: args.iter().map(&mut *f).collect(),
            },
            other => other.clone(),
        }
    }

    /// Replaces type parameters by arguments; missing arguments become
    /// `any`.
    ///
    /// ```
    /// use tyconform_check::types::Ty;
    ///
    /// let dict_value = Ty::union([Ty::Param("T".into()), Ty::UNDEFINED]);
    /// let ty = dict_value.substitute(&["T".to_string()], &[Ty::named("Worker")]);
    /// assert_eq!(ty, Ty::union([Ty::named("Worker"), Ty::UNDEFINED]));
    /// ```
    #[must_use]
    pub fn substitute(&self, params: &[String], args: &[Ty]) -> Ty {
        if params.is_empty() {
            return self.clone();
        }
        self.subst_with(&mut |ty| match ty {
            Ty::Param(name) => params
                .iter()
                .position(|p| p == name)
                .map(|idx| args.get(idx).cloned().unwrap_or(Ty::Any)),
            _ => None,
        })
    }

    /// Replaces polymorphic `this` by the receiver type.
    #[must_use]
    pub fn replace_this(&self, receiver: &Ty) -> Ty {
        self.subst_with(&mut |ty| matches!(ty, Ty::This).then(|| receiver.clone()))
    }

    fn subst_with(&self, f: &mut impl FnMut(&Ty) -> Option<Ty>) -> Ty {
        if let Some(replaced) = f(self) {
            return replaced;
        }
        self.map_children(&mut |child| child.subst_with(f))
    }

    /// Substitutes inside a shape.
    #[must_use]
    pub fn substitute_shape(shape: &ObjectShape, params: &[String], args: &[Ty]) -> ObjectShape {
        if params.is_empty() {
            return shape.clone();
        }
        shape.map(&mut |ty| ty.substitute(params, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: Ty, optional: bool, rest: bool) -> ParamTy {
        ParamTy {
            name: name.to_string(),
            ty,
            optional,
            rest,
        }
    }

    #[test]
    fn test_union_flattens_and_dedupes() {
        let ty = Ty::union([
            Ty::str_lit("json"),
            Ty::union([Ty::str_lit("advanced"), Ty::str_lit("json")]),
            Ty::Never,
        ]);
        assert_eq!(ty, Ty::Union(vec![Ty::str_lit("json"), Ty::str_lit("advanced")]));
    }

    #[test]
    fn test_union_absorbs_any_and_empty_is_never() {
        assert_eq!(Ty::union([Ty::STRING, Ty::Any]), Ty::Any);
        assert_eq!(Ty::union([]), Ty::Never);
    }

    #[test]
    fn test_non_nullish() {
        assert_eq!(Ty::UNDEFINED.non_nullish(), Ty::Never);
        let ty = Ty::union([Ty::STRING, Ty::NULL, Ty::UNDEFINED]);
        assert!(ty.is_possibly_nullish());
        assert_eq!(ty.non_nullish(), Ty::STRING);
        assert_eq!(ty.nullish_part(), Ty::union([Ty::NULL, Ty::UNDEFINED]));
    }

    #[test]
    fn test_widen() {
        assert_eq!(Ty::str_lit("a").widen(), Ty::STRING);
        assert_eq!(Ty::Literal(Lit::Num(1.0)).widen(), Ty::NUMBER);
        assert_eq!(
            Ty::union([Ty::str_lit("a"), Ty::str_lit("b"), Ty::UNDEFINED]).widen(),
            Ty::union([Ty::STRING, Ty::UNDEFINED])
        );
    }

    #[test]
    fn test_signature_arity() {
        let sig = Signature {
            params: vec![
                param("message", Ty::STRING, false, false),
                param("callback", Ty::Any, true, false),
            ],
            ret: Ty::BOOLEAN,
        };
        assert_eq!(sig.required(), 1);
        assert!(sig.accepts_arity(1));
        assert!(sig.accepts_arity(2));
        assert!(!sig.accepts_arity(0));
        assert!(!sig.accepts_arity(3));
        assert_eq!(sig.arity_label(), "1-2");
    }

    #[test]
    fn test_rest_parameter_receives_surplus() {
        let sig = Signature {
            params: vec![
                param("message", Ty::Any, true, false),
                param("rest", Ty::Array(Box::new(Ty::NUMBER)), false, true),
            ],
            ret: Ty::VOID,
        };
        assert!(sig.accepts_arity(5));
        assert_eq!(sig.arity_label(), "0+");
        let (param, ty) = sig.param_for(3).unwrap();
        assert_eq!(param.name, "rest");
        assert_eq!(ty, Ty::NUMBER);
    }

    #[test]
    fn test_replace_this_in_method() {
        let method = Ty::Function(vec![Signature {
            params: vec![],
            ret: Ty::This,
        }]);
        let Ty::Function(sigs) = method.replace_this(&Ty::named("Worker")) else {
            panic!("expected function");
        };
        assert_eq!(sigs[0].ret, Ty::named("Worker"));
    }

    #[test]
    fn test_shape_insert_collects_overloads() {
        let mut shape = ObjectShape::default();
        let method = |ret: Ty| PropTy {
            name: "send".to_string(),
            ty: Ty::Function(vec![Signature { params: vec![], ret }]),
            optional: false,
            readonly: false,
        };
        shape.insert(method(Ty::BOOLEAN));
        shape.insert(method(Ty::VOID));
        let Some(PropTy {
            ty: Ty::Function(sigs), ..
        }) = shape.prop("send")
        else {
            panic!("expected method");
        };
        assert_eq!(sigs.len(), 2);
    }

    #[test]
    fn test_overlay_shadows() {
        let prop = |ty: Ty| PropTy {
            name: "on".to_string(),
            ty,
            optional: false,
            readonly: false,
        };
        let mut base = ObjectShape::default();
        base.insert(prop(Ty::STRING));
        let mut derived = ObjectShape::default();
        derived.insert(prop(Ty::NUMBER));
        base.overlay(derived);
        assert_eq!(base.props.len(), 1);
        assert_eq!(base.prop("on").unwrap().ty, Ty::NUMBER);
    }
}
