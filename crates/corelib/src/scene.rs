//! Scene: named entities with Transform, parent links and Renderable.

use thiserror::Error;

use crate::{Mat4, Vec3, transform::Transform};

/// Entity id (dense, index into component arrays).
pub type Entity = u32;

/// Index of a mesh uploaded to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Drawable component: mesh plus flat object color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub color: Vec3,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("entity {0} does not exist")]
    UnknownEntity(Entity),
    #[error("parenting {child} under {parent} would create a cycle")]
    Cycle { child: Entity, parent: Entity },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Object hierarchy stored in dense parallel arrays.
#[derive(Default)]
pub struct Scene {
    names: Vec<String>,
    transforms: Vec<Transform>,
    parents: Vec<Option<Entity>>,
    renderables: Vec<Option<Renderable>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Spawn a root entity.
    pub fn spawn(&mut self, name: impl Into<String>, t: Transform, r: Option<Renderable>) -> Entity {
        let id = self.names.len() as Entity;
        self.names.push(name.into());
        self.transforms.push(t);
        self.parents.push(None);
        self.renderables.push(r);
        id
    }

    #[inline]
    pub fn contains(&self, e: Entity) -> bool {
        (e as usize) < self.names.len()
    }

    pub fn name(&self, e: Entity) -> Option<&str> {
        self.names.get(e as usize).map(String::as_str)
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.names.iter().position(|n| n == name).map(|i| i as Entity)
    }

    pub fn transform(&self, e: Entity) -> Option<&Transform> {
        self.transforms.get(e as usize)
    }

    pub fn renderable_mut(&mut self, e: Entity) -> Option<&mut Renderable> {
        self.renderables.get_mut(e as usize)?.as_mut()
    }

    pub fn parent(&self, e: Entity) -> Option<Entity> {
        self.parents.get(e as usize).copied().flatten()
    }

    /// Re-parent `child`; `None` makes it a root.
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> SceneResult<()> {
        if !self.contains(child) {
            return Err(SceneError::UnknownEntity(child));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::UnknownEntity(p));
            }
            // Walk up from the new parent; meeting `child` means a loop.
            let mut cur = Some(p);
            while let Some(e) = cur {
                if e == child {
                    return Err(SceneError::Cycle { child, parent: p });
                }
                cur = self.parent(e);
            }
        }
        self.parents[child as usize] = parent;
        Ok(())
    }

    pub fn children(&self, e: Entity) -> impl Iterator<Item = Entity> + '_ {
        (0..self.len() as Entity).filter(move |&c| self.parent(c) == Some(e))
    }

    pub fn roots(&self) -> impl Iterator<Item = Entity> + '_ {
        (0..self.len() as Entity).filter(move |&e| self.parent(e).is_none())
    }

    /// Local transform composed with every ancestor's.
    pub fn world_matrix(&self, e: Entity) -> Option<Mat4> {
        let mut m = self.transform(e)?.matrix();
        let mut cur = self.parent(e);
        while let Some(p) = cur {
            m = self.transforms[p as usize].matrix() * m;
            cur = self.parent(p);
        }
        Some(m)
    }

    /// Iterate over (world matrix, Renderable) pairs.
    pub fn iter_renderables(&self) -> impl Iterator<Item = (Mat4, &Renderable)> + '_ {
        (0..self.len()).filter_map(move |i| {
            let r = self.renderables[i].as_ref()?;
            Some((self.world_matrix(i as Entity)?, r))
        })
    }
}
