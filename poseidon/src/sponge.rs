use witcalc_number::FieldElement;

use crate::params::{Poseidon2Params, CAPACITY, WIDTH};
use crate::permutation::permute;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Absorbing,
    Squeezing,
}

/// A sponge over the Poseidon2 permutation.
///
/// Input is added into the rate portion of the state, `RATE` elements per
/// block, with a permutation between blocks. The first state element is the
/// capacity and never receives input directly. Once squeezing has started
/// no further input can be absorbed.
#[derive(Clone, Debug)]
pub struct Poseidon2<'a, T: FieldElement> {
    params: &'a Poseidon2Params<T>,
    state: [T; WIDTH],
    mode: Mode,
    index: usize,
}

impl<'a, T: FieldElement> Poseidon2<'a, T> {
    pub fn new(params: &'a Poseidon2Params<T>) -> Self {
        Poseidon2 {
            params,
            state: [T::zero(); WIDTH],
            mode: Mode::Absorbing,
            index: CAPACITY,
        }
    }

    /// Absorbs a single element.
    ///
    /// Panics if the sponge is already squeezing.
    pub fn absorb(&mut self, element: T) {
        assert_eq!(self.mode, Mode::Absorbing, "cannot absorb while squeezing");

        if self.index == WIDTH {
            permute(self.params, &mut self.state);
            self.index = CAPACITY;
        }

        self.state[self.index] += element;
        self.index += 1;
    }

    /// Absorbs all elements in order.
    pub fn absorb_batch(&mut self, elements: &[T]) {
        for element in elements {
            self.absorb(*element);
        }
    }

    /// Squeezes a single element out of the sponge.
    pub fn squeeze(&mut self) -> T {
        if self.mode == Mode::Absorbing || self.index == WIDTH {
            permute(self.params, &mut self.state);
            self.mode = Mode::Squeezing;
            self.index = CAPACITY;
        }

        let element = self.state[self.index];
        self.index += 1;
        element
    }
}

/// Hashes `inputs` by absorbing all of them and squeezing a single element.
pub fn hash<T: FieldElement>(params: &Poseidon2Params<T>, inputs: &[T]) -> T {
    let mut sponge = Poseidon2::new(params);
    sponge.absorb_batch(inputs);
    sponge.squeeze()
}
