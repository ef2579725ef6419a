use std::ops::{Index, IndexMut};

use glam::Vec2;

/// Deepest allowed bone chain, root included.
pub const MAX_DEPTH: usize = 3;

/// Index of a bone inside its [`Skeleton`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BoneId(u16);

impl BoneId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Offset from the owning character's position.
    pub position: Vec2,
    /// Radians, counter-clockwise.
    pub rotation: f32,
    pub scale: Vec2,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
}

impl Bone {
    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena of bones forming one tree rooted at `"root"`.
///
/// The shape is fixed once built; only transforms change afterwards.
/// Iteration order is insertion order, so parents come before children.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    bones: Vec<Bone>,
}

impl Skeleton {
    pub const ROOT: BoneId = BoneId(0);

    pub fn new(root_scale: Vec2) -> Self {
        Self {
            bones: vec![Bone {
                name: "root".to_string(),
                position: Vec2::ZERO,
                rotation: 0.0,
                scale: root_scale,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Adds a bone under `parent`.
    ///
    /// # Panics
    /// If `parent` is not in this skeleton or the chain would exceed [`MAX_DEPTH`].
    pub fn add_bone(&mut self, parent: BoneId, name: &str, position: Vec2, scale: Vec2) -> BoneId {
        assert!(parent.index() < self.bones.len(), "unknown parent bone {parent:?}");
        assert!(
            self.depth(parent) < MAX_DEPTH,
            "bone `{name}` would exceed depth {MAX_DEPTH}"
        );

        let id = BoneId(self.bones.len() as u16);
        self.bones.push(Bone {
            name: name.to_string(),
            position,
            rotation: 0.0,
            scale,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.bones[parent.index()].children.push(id);
        id
    }

    pub fn get(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.index())
    }

    pub fn get_mut(&mut self, id: BoneId) -> Option<&mut Bone> {
        self.bones.get_mut(id.index())
    }

    pub fn find(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .position(|b| b.name == name)
            .map(|i| BoneId(i as u16))
    }

    /// Number of bones from `id` up to the root, inclusive (root is 1).
    pub fn depth(&self, id: BoneId) -> usize {
        let mut depth = 1;
        let mut cur = self.get(id).and_then(Bone::parent);
        while let Some(p) = cur {
            depth += 1;
            cur = self.get(p).and_then(Bone::parent);
        }
        depth
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &Bone)> {
        self.bones.iter().enumerate().map(|(i, b)| (BoneId(i as u16), b))
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

impl Index<BoneId> for Skeleton {
    type Output = Bone;

    fn index(&self, id: BoneId) -> &Bone {
        &self.bones[id.index()]
    }
}

impl IndexMut<BoneId> for Skeleton {
    fn index_mut(&mut self, id: BoneId) -> &mut Bone {
        &mut self.bones[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (Skeleton, BoneId, BoneId) {
        let mut s = Skeleton::new(Vec2::ONE);
        let body = s.add_bone(Skeleton::ROOT, "body", Vec2::new(0.0, 0.5), Vec2::ONE);
        let head = s.add_bone(body, "head", Vec2::new(0.0, 0.3), Vec2::ONE);
        (s, body, head)
    }

    #[test]
    fn links_parent_and_children() {
        let (s, body, head) = chain();
        assert!(s[Skeleton::ROOT].is_root());
        assert_eq!(s[Skeleton::ROOT].children(), &[body]);
        assert_eq!(s[head].parent(), Some(body));
        assert_eq!(s.depth(head), 3);
    }

    #[test]
    fn find_by_name() {
        let (s, body, _) = chain();
        assert_eq!(s.find("body"), Some(body));
        assert_eq!(s.find("root"), Some(Skeleton::ROOT));
        assert_eq!(s.find("tail"), None);
    }

    #[test]
    fn iteration_puts_parents_first() {
        let (s, _, _) = chain();
        let names: Vec<_> = s.iter().map(|(_, b)| b.name.as_str()).collect();
        assert_eq!(names, ["root", "body", "head"]);
    }

    #[test]
    #[should_panic(expected = "exceed depth")]
    fn rejects_fourth_level() {
        let (mut s, _, head) = chain();
        s.add_bone(head, "hat", Vec2::ZERO, Vec2::ONE);
    }
}
