//! Test case descriptors
//!
//! A [`Case`] pairs an invoker, which calls the vector operation under test,
//! with a scalar reference that computes what every output position should
//! hold. Both closures see the same [`Inputs`] and never mutate them. Values
//! a case needs on both sides, such as a divisor or an index list, are
//! captured by the closures when the case is built.

use serde::Serialize;
use std::fmt;
use vecprobe_simd::{Lane, Mask, Simd};

use crate::compare::Policy;
use crate::corpus::CorpusProfile;
use crate::element::Element;
use crate::scalar::{Expected, Scalar, ToScalar};

/// Default error cap
pub const MAX_ERRORS: usize = 10;

/// Error cap for transcendental math cases
pub const MAX_MATH_ERRORS: usize = 5;

/// Random trials per permutation-family case
pub const TRIALS: usize = 20;

/// Entries in the random index and data tables drawn for every trial
pub const TABLE_LEN: usize = 1024;

/// Operands for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a, T> {
    /// First operand, at least one vector long
    pub a: &'a [T],
    /// Second operand; empty for single-operand plans
    pub b: &'a [T],
    /// Control flags, one per lane
    pub flags: &'a [bool],
    /// Fresh random bits for cases that load bit-packed data
    pub bitfield: u64,
    /// Random index table of a trial
    pub indexes: &'a [i32],
    /// Random data table of a trial
    pub table: &'a [T],
}

impl<'a, T: Lane> Inputs<'a, T> {
    pub fn a_vector<const N: usize>(&self) -> Simd<T, N> {
        Simd::from_slice(self.a)
    }

    pub fn b_vector<const N: usize>(&self) -> Simd<T, N> {
        Simd::from_slice(self.b)
    }

    pub fn flag_mask<const N: usize>(&self) -> Mask<N> {
        Mask::from_array(std::array::from_fn(|n| self.flags[n]))
    }

    /// First `N` entries of the random index table as a vector
    pub fn index_vector<const N: usize>(&self) -> Simd<i32, N> {
        Simd::from_slice(self.indexes)
    }
}

/// How operand vectors are drawn from the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Plan {
    /// Every vector of A against every vector of B
    Cross,
    /// Every vector of A alone
    Single,
    /// Vector `i` of A against vector `i` of B; used for exhaustive corpora
    Diagonal,
    /// Fresh random data and index tables per trial
    Trials {
        count: usize,
        /// Random indexes are drawn modulo this value
        modulo: u32,
    },
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cross => f.write_str("cross"),
            Self::Single => f.write_str("single"),
            Self::Diagonal => f.write_str("diagonal"),
            Self::Trials { count, .. } => write!(f, "{count} trials"),
        }
    }
}

/// How results line up with inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shape {
    /// Output lane `n` depends on input lane `n` only
    Lanewise,
    /// The output vector is compared as a whole; every lane is shown on failure
    Whole,
    /// One scalar result per vector
    Scalar,
    /// Output positions are selected by an index list
    Indexed,
}

type Invoke<T> = Box<dyn Fn(&Inputs<'_, T>) -> Vec<Scalar>>;
type Reference<T> = Box<dyn Fn(&Inputs<'_, T>) -> Vec<Expected>>;
type Labels<T> = Box<dyn Fn(&Inputs<'_, T>) -> Vec<i32>>;

/// One resolved test case for lane type `T`.
pub struct Case<T> {
    pub id: u32,
    pub name: &'static str,
    /// Lanes per operand vector
    pub lanes: usize,
    pub plan: Plan,
    pub shape: Shape,
    /// Whether the operation takes a second operand. Fixed at construction,
    /// so a unary case moved onto the diagonal still reports one operand.
    pub binary: bool,
    pub policy: Policy,
    pub profile: CorpusProfile,
    /// Draw a random bitfield, and flags from it, for every invocation
    pub uses_bitfield: bool,
    pub max_errors: usize,
    /// Extra line printed with the run summary
    pub note: Option<String>,
    invoke: Invoke<T>,
    reference: Reference<T>,
    labels: Option<Labels<T>>,
}

impl<T> fmt::Debug for Case<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("lanes", &self.lanes)
            .field("plan", &self.plan)
            .field("shape", &self.shape)
            .field("binary", &self.binary)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T: Element> Case<T> {
    pub fn new(
        id: u32,
        name: &'static str,
        lanes: usize,
        plan: Plan,
        shape: Shape,
        invoke: impl Fn(&Inputs<'_, T>) -> Vec<Scalar> + 'static,
        reference: impl Fn(&Inputs<'_, T>) -> Vec<Expected> + 'static,
    ) -> Self {
        Self {
            id,
            name,
            lanes,
            plan,
            shape,
            binary: plan != Plan::Single,
            policy: Policy::EXACT,
            profile: CorpusProfile::default(),
            uses_bitfield: false,
            max_errors: MAX_ERRORS,
            note: None,
            invoke: Box::new(invoke),
            reference: Box::new(reference),
            labels: None,
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_profile(mut self, profile: CorpusProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_bitfield(mut self) -> Self {
        self.uses_bitfield = true;
        self
    }

    /// Label each output position with the index that selected it.
    pub fn with_labels(mut self, labels: impl Fn(&Inputs<'_, T>) -> Vec<i32> + 'static) -> Self {
        self.shape = Shape::Indexed;
        self.labels = Some(Box::new(labels));
        self
    }

    /// Enumerate the whole lane domain on the diagonal.
    pub fn exhaustive(mut self) -> Self {
        if !matches!(self.plan, Plan::Trials { .. }) {
            self.plan = Plan::Diagonal;
            self.profile.exhaustive = true;
        }
        self
    }

    pub fn invoke(&self, inputs: &Inputs<'_, T>) -> Vec<Scalar> {
        (self.invoke)(inputs)
    }

    pub fn reference(&self, inputs: &Inputs<'_, T>) -> Vec<Expected> {
        (self.reference)(inputs)
    }

    /// Index labels for an indexed case
    pub fn labels(&self, inputs: &Inputs<'_, T>) -> Option<Vec<i32>> {
        self.labels.as_ref().map(|labels| labels(inputs))
    }
}

/// Lanes of a result vector as scalars
pub fn scalars<R: Lane + ToScalar, const M: usize>(v: Simd<R, M>) -> Vec<Scalar> {
    v.as_array().iter().map(|x| x.to_scalar()).collect()
}

/// One-operand lanewise case.
pub fn unary<T: Element, R: Element, const N: usize>(
    id: u32,
    name: &'static str,
    op: impl Fn(Simd<T, N>) -> Simd<R, N> + 'static,
    reference: impl Fn(T) -> Expected + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        Plan::Single,
        Shape::Lanewise,
        move |x| scalars(op(x.a_vector())),
        move |x| x.a[..N].iter().map(|&a| reference(a)).collect(),
    )
}

/// Two-operand lanewise case over the cross product of both corpora.
pub fn binary<T: Element, R: Element, const N: usize>(
    id: u32,
    name: &'static str,
    op: impl Fn(Simd<T, N>, Simd<T, N>) -> Simd<R, N> + 'static,
    reference: impl Fn(T, T) -> Expected + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        Plan::Cross,
        Shape::Lanewise,
        move |x| scalars(op(x.a_vector(), x.b_vector())),
        move |x| x.a[..N].iter().zip(x.b).map(|(&a, &b)| reference(a, b)).collect(),
    )
}

/// Two-operand case whose lanes are selected by the control flags.
pub fn flagged<T: Element, const N: usize>(
    id: u32,
    name: &'static str,
    op: impl Fn(Simd<T, N>, Mask<N>, Simd<T, N>) -> Simd<T, N> + 'static,
    reference: impl Fn(bool, T, T) -> Expected + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        Plan::Cross,
        Shape::Lanewise,
        move |x| scalars(op(x.a_vector(), x.flag_mask(), x.b_vector())),
        move |x| {
            (0..N)
                .map(|n| reference(x.flags[n], x.a[n], x.b[n]))
                .collect()
        },
    )
    .with_bitfield()
}

/// Reduction of one vector to a scalar.
pub fn horizontal<T: Element, R: ToScalar, const N: usize>(
    id: u32,
    name: &'static str,
    op: impl Fn(Simd<T, N>) -> R + 'static,
    reference: impl Fn(&[T]) -> Expected + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        Plan::Single,
        Shape::Scalar,
        move |x| vec![op(x.a_vector()).to_scalar()],
        move |x| vec![reference(&x.a[..N])],
    )
}

/// Whole-vector case with any output width.
pub fn whole<T: Element, R: Element, const M: usize>(
    id: u32,
    name: &'static str,
    lanes: usize,
    plan: Plan,
    op: impl Fn(&Inputs<'_, T>) -> Simd<R, M> + 'static,
    reference: impl Fn(&Inputs<'_, T>) -> Vec<Expected> + 'static,
) -> Case<T> {
    Case::new(
        id,
        name,
        lanes,
        plan,
        Shape::Whole,
        move |x| scalars(op(x)),
        reference,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    fn inputs<'a>(a: &'a [i32], b: &'a [i32], flags: &'a [bool]) -> Inputs<'a, i32> {
        Inputs {
            a,
            b,
            flags,
            bitfield: 0,
            indexes: &[],
            table: &[],
        }
    }

    #[test]
    fn test_binary_case_runs_both_sides() {
        let case = binary::<i32, i32, 4>(1, "add", |a, b| a + b, |a, b| Expected::of(a.wrapping_add(b)));
        let x = inputs(&[1, 2, 3, i32::MAX], &[10, 20, 30, 1], &[]);
        assert_eq!(case.invoke(&x), case.reference(&x).iter().map(|e| match e {
            Expected::Value(v) => *v,
            _ => Scalar::Bool(false),
        }).collect::<Vec<_>>());
        assert_eq!(case.plan, Plan::Cross);
        assert!(case.binary);
        assert_eq!(case.max_errors, MAX_ERRORS);
    }

    #[test]
    fn test_flagged_case_reads_flags() {
        let case = flagged::<i32, 4>(
            14,
            "if_add",
            |a, m, b| a.if_add(m, b),
            |f, a, b| Expected::of(if f { a + b } else { a }),
        );
        assert!(case.uses_bitfield);
        let x = inputs(&[1, 1, 1, 1], &[5, 5, 5, 5], &[true, false, true, false]);
        assert_eq!(case.invoke(&x)[..2], [Scalar::Signed(6), Scalar::Signed(1)]);
    }

    #[test]
    fn test_exhaustive_switches_to_diagonal() {
        let case = unary::<i32, i32, 4>(8, "neg", |a| -a, |a| Expected::of(a.wrapping_neg())).exhaustive();
        assert_eq!(case.plan, Plan::Diagonal);
        assert!(case.profile.exhaustive);
        assert!(!case.binary);
    }
}
