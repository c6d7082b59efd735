//! Axis labels and per-axis containers.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

#[cfg(any(test, feature = "for-testing"))]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x- or y-axis of a 2D grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim2 {
    X = 0,
    Y = 1,
}

impl Dim2 {
    /// Creates an array for iterating over the 2D dimensions.
    pub fn slice() -> [Self; 2] {
        [Dim2::X, Dim2::Y]
    }
}

impl fmt::Display for Dim2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Dim2::X => "x",
            Dim2::Y => "y",
        })
    }
}

/// Denotes the x-, y- or z-component of a 3D quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim3 {
    X = 0,
    Y = 1,
    Z = 2,
}

/// One value of type `T` for each of the two grid axes.
#[derive(Clone, Debug, PartialEq)]
pub struct In2D<T>([T; 2]);

impl<T> In2D<T> {
    /// Creates a new 2D container from the x- and y-values.
    pub fn new(x: T, y: T) -> Self {
        In2D([x, y])
    }

    /// Creates a new 2D container by evaluating the given closure for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim2) -> T,
    {
        Self::new(create_component(Dim2::X), create_component(Dim2::Y))
    }

    /// Applies the given closure to each component and returns the results.
    pub fn map<U, C>(self, mut map_component: C) -> In2D<U>
    where
        C: FnMut(T) -> U,
    {
        let [x, y] = self.0;
        In2D::new(map_component(x), map_component(y))
    }

    /// Consumes the container and returns the components as a tuple.
    pub fn into_tuple(self) -> (T, T) {
        let [x, y] = self.0;
        (x, y)
    }
}

impl<T> Index<Dim2> for In2D<T> {
    type Output = T;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim2> for In2D<T> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

/// One value of type `T` for each of the three spatial components.
#[derive(Clone, Debug, PartialEq)]
pub struct In3D<T>([T; 3]);

impl<T> In3D<T> {
    /// Creates a new 3D container from the x-, y- and z-values.
    pub fn new(x: T, y: T, z: T) -> Self {
        In3D([x, y, z])
    }

    /// Creates a 3D container from the x- and y-values of a 2D container
    /// and the given z-value.
    pub fn from_in2d_and_z(xy: In2D<T>, z: T) -> Self {
        let (x, y) = xy.into_tuple();
        Self::new(x, y, z)
    }

    /// Consumes the container and returns the components as a tuple.
    pub fn into_tuple(self) -> (T, T, T) {
        let [x, y, z] = self.0;
        (x, y, z)
    }
}

impl<T> Index<Dim3> for In3D<T> {
    type Output = T;
    fn index(&self, dim: Dim3) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim3> for In3D<T> {
    fn index_mut(&mut self, dim: Dim3) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl<T> AbsDiffEq for In2D<T>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = <T as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Dim2::slice()
            .iter()
            .all(|&dim| T::abs_diff_eq(&self[dim], &other[dim], epsilon))
    }
}

#[cfg(any(test, feature = "for-testing"))]
impl<T> RelativeEq for In2D<T>
where
    T: RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        Dim2::slice()
            .iter()
            .all(|&dim| T::relative_eq(&self[dim], &other[dim], epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn components_are_indexed_by_dimension() {
        let mut pair = In2D::new(1.0, 2.0);
        pair[Dim2::Y] = 5.0;
        assert_eq!(pair[Dim2::X], 1.0);
        assert_eq!(pair.into_tuple(), (1.0, 5.0));

        let triple = In3D::from_in2d_and_z(In2D::new(1, 2), 3);
        assert_eq!(triple.into_tuple(), (1, 2, 3));
    }

    #[test]
    fn dimensions_display_as_axis_names() {
        let names = Dim2::slice().map(|dim| dim.to_string());
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn pairs_compare_componentwise_within_tolerance() {
        let pair = In2D::new(1.0, -200.0);
        assert_abs_diff_eq!(pair, In2D::new(1.0 + 1e-10, -200.0), epsilon = 1e-9);
        assert!(!pair.abs_diff_eq(&In2D::new(1.0, -200.1), 1e-9));
        assert_relative_eq!(pair, In2D::new(1.0, -200.0 * (1.0 + 1e-13)), max_relative = 1e-12);
    }
}
