//! Calls, constructor calls and overload resolution.

use super::Checker;
use crate::error::{Target, TypeError};
use crate::types::{Signature, Ty};
use tyconform_log::trace;
use tyconform_syntax::ast::Expr;
use tyconform_syntax::{Span, Spanned};

impl Checker<'_> {
    /// Type of `callee(args)`.
    pub(super) fn call(&mut self, callee_ty: &Ty, callee: &Expr, args: &[Expr], span: Span) -> Ty {
        if callee_ty.is_any_like() {
            self.synth_args(args);
            return callee_ty.clone();
        }

        let sigs = match self.catalog.expand_alias(callee_ty) {
            Ty::Function(sigs) => sigs,
            ty => self.catalog.shape_of(&ty).map(|shape| shape.calls).unwrap_or_default(),
        };
        if sigs.is_empty() {
            self.error(TypeError::NotCallable {
                ty: callee_ty.clone(),
                span: callee.span(),
            });
            self.synth_args(args);
            return Ty::Error;
        }

        self.resolve_overloads(&sigs, args, span)
    }

    /// Type of `new callee(args)`.
    pub(super) fn construct(&mut self, callee_ty: &Ty, callee: &Expr, args: &[Expr], span: Span) -> Ty {
        if callee_ty.is_any_like() {
            self.synth_args(args);
            return callee_ty.clone();
        }

        let sigs = self
            .catalog
            .shape_of(&self.catalog.expand_alias(callee_ty))
            .map(|shape| shape.constructs)
            .unwrap_or_default();
        if sigs.is_empty() {
            self.error(TypeError::NotConstructible {
                ty: callee_ty.clone(),
                span: callee.span(),
            });
            self.synth_args(args);
            return Ty::Error;
        }

        self.resolve_overloads(&sigs, args, span)
    }

    fn synth_args(&mut self, args: &[Expr]) {
        for arg in args {
            self.synth_expr(arg);
        }
    }

    /// Picks the first overload that accepts the arguments and returns its
    /// result type. When none does, the errors of the closest overload are
    /// kept: arity-compatible first, then fewest errors, then declaration
    /// order.
    fn resolve_overloads(&mut self, sigs: &[Signature], args: &[Expr], span: Span) -> Ty {
        if let [sig] = sigs {
            self.check_args(sig, args, span);
            return sig.ret.clone();
        }

        let mark = self.errors.len();
        let mut best: Option<((bool, usize, usize), Vec<TypeError>)> = None;

        for (index, sig) in sigs.iter().enumerate() {
            self.check_args(sig, args, span);
            let errors = self.errors.split_off(mark);
            if errors.is_empty() {
                trace!(overload = index, "overload selected");
                return sig.ret.clone();
            }

            let rank = (!sig.accepts_arity(args.len()), errors.len(), index);
            if best.as_ref().is_none_or(|(best_rank, _)| rank < *best_rank) {
                best = Some((rank, errors));
            }
        }

        match best {
            Some(((_, _, index), errors)) => {
                trace!(overload = index, errors = errors.len(), "no overload matched");
                self.errors.extend(errors);
                sigs[index].ret.clone()
            }
            None => Ty::Error,
        }
    }

    /// Checks arguments against one signature.
    pub(super) fn check_args(&mut self, sig: &Signature, args: &[Expr], span: Span) {
        let mut reported_count = false;

        for (index, arg) in args.iter().enumerate() {
            match sig.param_for(index) {
                Some((param, ty)) => {
                    let expected = if param.optional {
                        Ty::union([ty, Ty::UNDEFINED])
                    } else {
                        ty
                    };
                    let target = Target::Parameter(param.name.clone());
                    self.check_against(arg, &expected, &target);
                }
                None => {
                    self.synth_expr(arg);
                    if !reported_count {
                        reported_count = true;
                        self.error(TypeError::ArgumentCount {
                            expected: sig.arity_label(),
                            found: args.len(),
                            span: arg.span(),
                        });
                    }
                }
            }
        }

        for param in sig.params.iter().skip(args.len()) {
            if !param.optional && !param.rest {
                self.error(TypeError::MissingArgument {
                    param: param.name.clone(),
                    expected: param.ty.clone(),
                    span,
                });
            }
        }
    }
}
