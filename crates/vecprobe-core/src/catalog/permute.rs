//! Index-driven family: permute, blend, lookup, gather and scatter, plus
//! the instruction set probe

use vecprobe_simd::{compiled_instruction_set, instruction_set, Simd};

use super::{fixed_indexes, lanes_i32, trials, CaseOptions};
use crate::case::{scalars, Case, Inputs, Plan, Shape, TABLE_LEN};
use crate::config::IndexList;
use crate::element::Element;
use crate::error::{Error, Result};
use crate::oracle::permute;
use crate::scalar::{Expected, Scalar};

/// Destination length of the fixed-index scatter
const SCATTER_LEN: usize = 512;

fn index_note(indexes: &[i32]) -> String {
    format!("indexes {}", IndexList(indexes.to_vec()))
}

/// Lookup across `count` vectors cut from the trial's data table.
fn lookup<T: Element, const N: usize>(id: u32, name: &'static str, count: usize) -> Case<T> {
    Case::new(
        id,
        name,
        N,
        trials(count * N),
        Shape::Indexed,
        move |x: &Inputs<'_, T>| {
            let vectors: Vec<Simd<T, N>> = x.table[..count * N].chunks_exact(N).map(Simd::from_slice).collect();
            scalars(Simd::lookup(x.index_vector::<N>(), &vectors))
        },
        move |x: &Inputs<'_, T>| permute::select(&x.indexes[..N], &x.table[..count * N]),
    )
    .with_labels(|x: &Inputs<'_, T>| x.indexes[..N].to_vec())
}

/// Lanes moved by a fixed count taken from the index list.
fn shift<T: Element, const N: usize>(
    id: u32,
    name: &'static str,
    options: &CaseOptions,
    op: fn(Simd<T, N>, usize) -> Simd<T, N>,
    reference: fn(&[T], usize) -> Vec<Expected>,
) -> Result<Case<T>> {
    let value = options.indexes.first_or(1);
    let count = usize::try_from(value)
        .map_err(|_| Error::InvalidIndexes(format!("shift count {value} is negative")))?;
    let case = Case::new(
        id,
        name,
        N,
        trials(N),
        Shape::Whole,
        move |x: &Inputs<'_, T>| scalars(op(x.a_vector::<N>(), count)),
        move |x: &Inputs<'_, T>| reference(&x.a[..N], count),
    )
    .with_note(format!("count {count}"));
    Ok(case)
}

pub fn permute<T: Element, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    let n = lanes_i32(N);
    let case = match id {
        700 => {
            let indexes = fixed_indexes::<N>(id, options, |k| n - 1 - lanes_i32(k))?;
            Case::new(
                700,
                "permute",
                N,
                trials(N),
                Shape::Indexed,
                move |x: &Inputs<'_, T>| scalars(x.a_vector::<N>().permute(indexes)),
                move |x: &Inputs<'_, T>| permute::select(&indexes, &x.a[..N]),
            )
            .with_labels(move |_| indexes.to_vec())
            .with_note(index_note(&indexes))
        }
        701 => {
            let indexes = fixed_indexes::<N>(id, options, |k| lanes_i32(k) + lanes_i32(k & 1) * n)?;
            Case::new(
                701,
                "blend",
                N,
                trials(2 * N),
                Shape::Indexed,
                move |x: &Inputs<'_, T>| scalars(x.a_vector::<N>().blend(x.b_vector(), indexes)),
                move |x: &Inputs<'_, T>| permute::select(&indexes, &permute::joined(&x.a[..N], &x.b[..N])),
            )
            .with_labels(move |_| indexes.to_vec())
            .with_note(index_note(&indexes))
        }
        702 => lookup::<T, N>(702, "lookup", 1),
        703 => lookup::<T, N>(703, "lookup2", 2),
        704 => lookup::<T, N>(704, "lookup4", 4),
        705 => Case::new(
            705,
            "lookup_table",
            N,
            trials(TABLE_LEN),
            Shape::Indexed,
            |x: &Inputs<'_, T>| scalars(Simd::lookup_table(x.index_vector::<N>(), x.table)),
            |x: &Inputs<'_, T>| permute::select(&x.indexes[..N], x.table),
        )
        .with_labels(|x: &Inputs<'_, T>| x.indexes[..N].to_vec()),
        706 => shift::<T, N>(706, "shift_up", options, Simd::shift_up, permute::shift_up)?,
        707 => shift::<T, N>(707, "shift_down", options, Simd::shift_down, permute::shift_down)?,
        709 => {
            let indexes = fixed_indexes::<N>(id, options, |k| lanes_i32(k) * 3)?;
            Case::new(
                709,
                "gather",
                N,
                trials(N),
                Shape::Indexed,
                move |x: &Inputs<'_, T>| scalars(Simd::gather(indexes, x.table)),
                move |x: &Inputs<'_, T>| permute::select(&indexes, x.table),
            )
            .with_labels(move |_| indexes.to_vec())
            .with_note(index_note(&indexes))
        }
        710 => {
            let indexes = fixed_indexes::<N>(id, options, |k| 2 * (n - 1 - lanes_i32(k)))?;
            if let Some(&bad) = indexes.iter().find(|&&i| usize::try_from(i).is_ok_and(|i| i >= SCATTER_LEN)) {
                return Err(Error::InvalidIndexes(format!(
                    "scatter index {bad} is beyond the {SCATTER_LEN} element destination"
                )));
            }
            // Only the part of the destination the indexes can reach is compared.
            let region = indexes
                .iter()
                .filter_map(|&i| usize::try_from(i).ok())
                .max()
                .map_or(1, |i| i + 1);
            Case::new(
                710,
                "scatter",
                N,
                trials(N),
                Shape::Whole,
                move |x: &Inputs<'_, T>| {
                    let mut dst = vec![T::default(); SCATTER_LEN];
                    x.a_vector::<N>().scatter(indexes, &mut dst);
                    dst[..region].iter().map(|v| v.to_scalar()).collect()
                },
                move |x: &Inputs<'_, T>| {
                    permute::scatter(&x.a[..N], &indexes, SCATTER_LEN, region)
                        .into_iter()
                        .map(Expected::of)
                        .collect()
                },
            )
            .with_note(index_note(&indexes))
        }
        711 => Case::new(
            711,
            "scatter_limit",
            N,
            trials(2 * N),
            Shape::Whole,
            |x: &Inputs<'_, T>| {
                let mut dst = vec![T::default(); 2 * N];
                let limit = u32::try_from(N).unwrap_or(u32::MAX);
                x.a_vector::<N>().scatter_limit(x.index_vector::<N>(), limit, &mut dst);
                dst.iter().map(|v| v.to_scalar()).collect()
            },
            |x: &Inputs<'_, T>| {
                permute::scatter(&x.a[..N], &x.indexes[..N], N, 2 * N)
                    .into_iter()
                    .map(Expected::of)
                    .collect()
            },
        ),
        _ => return Ok(None),
    };
    Ok(Some(case))
}

/// The capability probe: the detected instruction set must be at least
/// the one the library was compiled for.
pub fn probe<T: Element, const N: usize, const HALF: usize, const DOUBLE: usize>(
    id: u32,
    _options: &CaseOptions,
) -> Result<Option<Case<T>>> {
    if id != 900 {
        return Ok(None);
    }
    let detected = instruction_set();
    let case = Case::new(
        900,
        "instrset",
        N,
        Plan::Trials { count: 1, modulo: 1 },
        Shape::Scalar,
        |_: &Inputs<'_, T>| vec![Scalar::Bool(instruction_set() >= compiled_instruction_set())],
        |_: &Inputs<'_, T>| vec![Expected::bool(true)],
    )
    .with_note(format!("instruction set {detected}"));
    Ok(Some(case))
}
