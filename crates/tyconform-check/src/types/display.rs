//! Pretty-printing for types.
//!
//! Types print the way they are written in declaration files, so messages
//! read `'"json" | "advanced"'` rather than a debug dump. [`normalize`]
//! puts a type into the canonical form used to compare `$ExpectType`
//! annotations.

use super::ty::{Lit, ObjectShape, ParamTy, PrimTy, Signature, Ty};
use std::fmt;

impl fmt::Display for PrimTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimTy::String => "string",
            PrimTy::Number => "number",
            PrimTy::Boolean => "boolean",
            PrimTy::Void => "void",
            PrimTy::Undefined => "undefined",
            PrimTy::Null => "null",
            PrimTy::Object => "object",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Str(value) => write!(f, "\"{value}\""),
            Lit::Num(value) => write!(f, "{value}"),
            Lit::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for ParamTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rest {
            f.write_str("...")?;
        }
        f.write_str(&self.name)?;
        if self.optional {
            f.write_str("?")?;
        }
        write!(f, ": {}", self.ty)
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[ParamTy]) -> fmt::Result {
    f.write_str("(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Signature {
    /// Arrow form: `(message: string) => boolean`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_params(f, &self.params)?;
        write!(f, " => {}", self.ret)
    }
}

impl fmt::Display for ObjectShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries = Vec::new();
        for sig in &self.calls {
            entries.push(member_sig("", sig));
        }
        for sig in &self.constructs {
            entries.push(member_sig("new ", sig));
        }
        for prop in &self.props {
            let readonly = if prop.readonly { "readonly " } else { "" };
            let optional = if prop.optional { "?" } else { "" };
            entries.push(format!("{readonly}{}{optional}: {}", prop.name, prop.ty));
        }
        if let Some(index) = &self.index {
            entries.push(format!("[key: string]: {index}"));
        }
        if entries.is_empty() {
            f.write_str("{}")
        } else {
            write!(f, "{{ {} }}", entries.join("; "))
        }
    }
}

/// Member form: `(message: string): boolean`.
fn member_sig(prefix: &str, sig: &Signature) -> String {
    let params: Vec<String> = sig.params.iter().map(ToString::to_string).collect();
    format!("{prefix}({}): {}", params.join(", "), sig.ret)
}

/// Whether `ty` needs parentheses inside `T[]` or a union.
fn needs_parens(ty: &Ty, in_union: bool) -> bool {
    match ty {
        Ty::Union(_) => !in_union,
        Ty::Function(sigs) => sigs.len() == 1,
        _ => false,
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Primitive(prim) => write!(f, "{prim}"),
            Ty::Literal(lit) => write!(f, "{lit}"),
            Ty::Any | Ty::Error => f.write_str("any"),
            Ty::Unknown => f.write_str("unknown"),
            Ty::Never => f.write_str("never"),
            Ty::This => f.write_str("this"),
            Ty::Param(name) => f.write_str(name),
            Ty::ClassCtor(name) => write!(f, "typeof {name}"),

            Ty::Array(elem) => {
                if needs_parens(elem, false) {
                    write!(f, "({elem})[]")
                } else {
                    write!(f, "{elem}[]")
                }
            }

            Ty::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    if needs_parens(member, true) {
                        write!(f, "({member})")?;
                    } else {
                        write!(f, "{member}")?;
                    }
                }
                Ok(())
            }

            Ty::Function(sigs) => match sigs.as_slice() {
                [sig] => write!(f, "{sig}"),
                sigs => {
                    let entries: Vec<String> = sigs.iter().map(|s| member_sig("", s)).collect();
                    write!(f, "{{ {} }}", entries.join("; "))
                }
            },

            Ty::Object(shape) => write!(f, "{shape}"),

            Ty::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
        }
    }
}

/// Canonical form of a type for equality checks.
///
/// Unions are flattened and sorted by their rendering, `true | false`
/// becomes `boolean`, literals whose primitive is also present are
/// dropped. Nested types are normalized too.
///
/// ```
/// use tyconform_check::types::{normalize, Lit, Ty};
///
/// let ty = Ty::union([
///     Ty::UNDEFINED,
///     Ty::Literal(Lit::Bool(true)),
///     Ty::Literal(Lit::Bool(false)),
/// ]);
/// assert_eq!(normalize(&ty).to_string(), "boolean | undefined");
/// ```
#[must_use]
pub fn normalize(ty: &Ty) -> Ty {
    match ty {
        Ty::Union(members) => normalize_union(members.iter().map(normalize).collect()),
        Ty::Array(elem) => Ty::Array(Box::new(normalize(elem))),
        Ty::Function(sigs) => Ty::Function(sigs.iter().map(normalize_sig).collect()),
        Ty::Object(shape) => {
            let mut shape = (**shape).clone();
            for prop in &mut shape.props {
                prop.ty = normalize(&prop.ty);
            }
            shape.props.sort_by(|a, b| a.name.cmp(&b.name));
            shape.index = shape.index.as_ref().map(normalize);
            shape.calls = shape.calls.iter().map(normalize_sig).collect();
            shape.constructs = shape.constructs.iter().map(normalize_sig).collect();
            Ty::Object(Box::new(shape))
        }
        Ty::Named { name, args } => Ty::Named {
            name: name.clone(),
            args: args.iter().map(normalize).collect(),
        },
        other => other.clone(),
    }
}

fn normalize_sig(sig: &Signature) -> Signature {
    Signature {
        params: sig
            .params
            .iter()
            .map(|p| ParamTy {
                ty: normalize(&p.ty),
                ..p.clone()
            })
            .collect(),
        ret: normalize(&sig.ret),
    }
}

fn normalize_union(members: Vec<Ty>) -> Ty {
    let flat = match Ty::union(members) {
        Ty::Union(flat) => flat,
        single => return single,
    };

    let has_true = flat.contains(&Ty::Literal(Lit::Bool(true)));
    let has_false = flat.contains(&Ty::Literal(Lit::Bool(false)));
    let merged = flat.into_iter().map(|m| match m {
        Ty::Literal(Lit::Bool(_)) if has_true && has_false => Ty::BOOLEAN,
        m => m,
    });
    let merged = match Ty::union(merged) {
        Ty::Union(merged) => merged,
        single => return single,
    };

    let mut kept: Vec<Ty> = merged
        .iter()
        .filter(|m| match m {
            Ty::Literal(lit) => !merged.contains(&Ty::Primitive(lit.base())),
            _ => true,
        })
        .cloned()
        .collect();

    kept.sort_by_cached_key(ToString::to_string);
    match kept.len() {
        1 => kept.remove(0),
        _ => Ty::Union(kept),
    }
}
