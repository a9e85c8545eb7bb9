//! Role identification and per-role data storage.
//!
//! ## Role
//!
//! A role is a participant slot in a game ("Xs", "Os", "One", ...). Roles are
//! fixed at the game-type level and ordered; `Role` is the index into that
//! order. Display names come from `Game::role_name`.
//!
//! ## RoleMap
//!
//! Per-role storage backed by `Vec` for O(1) access. Used for results,
//! evaluation vectors and player seating.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Role identifier supporting 1-255 roles.
///
/// Role indices are 0-based: the first role is `Role(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role(pub u8);

impl Role {
    /// Create a new role.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw role index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all roles of a game with `role_count` roles.
    ///
    /// ```
    /// use ludorum::core::Role;
    ///
    /// let roles: Vec<_> = Role::all(3).collect();
    /// assert_eq!(roles, vec![Role::new(0), Role::new(1), Role::new(2)]);
    /// ```
    pub fn all(role_count: usize) -> impl Iterator<Item = Role> {
        (0..role_count as u8).map(Role)
    }

    /// The role after this one, wrapping around.
    #[must_use]
    pub fn next(self, role_count: usize) -> Role {
        Role(((self.index() + 1) % role_count) as u8)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Role {}", self.0)
    }
}

/// Per-role data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use ludorum::core::{Role, RoleMap};
///
/// let mut result: RoleMap<f64> = RoleMap::with_value(2, 0.0);
/// result[Role::new(0)] = 1.0;
/// result[Role::new(1)] = -1.0;
///
/// assert_eq!(result.values().sum::<f64>(), 0.0);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleMap<T> {
    data: Vec<T>,
}

impl<T> RoleMap<T> {
    /// Create a new RoleMap with values from a factory function.
    pub fn new(role_count: usize, mut factory: impl FnMut(Role) -> T) -> Self {
        assert!(role_count > 0, "Must have at least 1 role");
        assert!(role_count <= 255, "At most 255 roles supported");

        let data = (0..role_count as u8).map(|i| factory(Role(i))).collect();

        Self { data }
    }

    /// Create a new RoleMap with all entries set to the same value.
    pub fn with_value(role_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(role_count, |_| value.clone())
    }

    /// Create a new RoleMap with default values.
    pub fn with_default(role_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(role_count, |_| T::default())
    }

    /// Build a RoleMap from one value per role, in role order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 role");
        assert!(data.len() <= 255, "At most 255 roles supported");
        Self { data }
    }

    /// Get the number of roles.
    #[must_use]
    pub fn role_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a role's data.
    #[must_use]
    pub fn get(&self, role: Role) -> &T {
        &self.data[role.index()]
    }

    /// Get a mutable reference to a role's data.
    pub fn get_mut(&mut self, role: Role) -> &mut T {
        &mut self.data[role.index()]
    }

    /// Iterate over (Role, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (Role(i as u8), v))
    }

    /// Iterate over (Role, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Role, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (Role(i as u8), v))
    }

    /// Iterate over the values in role order.
    pub fn values(&self) -> impl Iterator<Item = &T> + Clone {
        self.data.iter()
    }

    /// Iterate over all roles.
    pub fn roles(&self) -> impl Iterator<Item = Role> {
        (0..self.data.len() as u8).map(Role)
    }

    /// Map every entry to a new value.
    pub fn map<U>(&self, f: impl Fn(Role, &T) -> U) -> RoleMap<U> {
        RoleMap {
            data: self.iter().map(|(r, v)| f(r, v)).collect(),
        }
    }
}

impl<T> Index<Role> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: Role) -> &Self::Output {
        self.get(role)
    }
}

impl<T> IndexMut<Role> for RoleMap<T> {
    fn index_mut(&mut self, role: Role) -> &mut Self::Output {
        self.get_mut(role)
    }
}
