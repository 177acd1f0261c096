use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType};

/// A merged rectangle of coplanar block faces, produced by the greedy mesher.
///
/// The rectangle lies on the slice boundary `slice` of axis `block_side.axis()`. Its
/// extent is measured along the two remaining axes `u = (axis + 1) % 3` and
/// `v = (axis + 2) % 3`, starting at `(u, v)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    /// Boundary index along the face axis, in `[0, CHUNK_DIMENSION]`
    pub slice: usize,
    /// Start of the rectangle along the `u` axis
    pub u: usize,
    /// Start of the rectangle along the `v` axis
    pub v: usize,
    /// Extent along the `u` axis, in blocks
    pub width: usize,
    /// Extent along the `v` axis, in blocks
    pub height: usize,
    /// The block type every merged face shares
    pub block_type: BlockType,
    /// Which side of the blocks this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Axis indices `(axis, u, v)` of the plane this face lies in.
    pub fn axes(&self) -> (usize, usize, usize) {
        let axis = self.block_side.axis();
        (axis, (axis + 1) % 3, (axis + 2) % 3)
    }

    /// Returns the four corners in counter-clockwise order seen from the side the
    /// face points to, together with the local UV of each corner.
    ///
    /// # Returns
    /// `(corners, uvs)` where `corners[0]` is the rectangle origin.
    pub fn corners(&self) -> ([Point3<f32>; 4], [[f32; 2]; 4]) {
        let (axis, u_axis, v_axis) = self.axes();

        let mut origin = [0.0f32; 3];
        origin[axis] = self.slice as f32;
        origin[u_axis] = self.u as f32;
        origin[v_axis] = self.v as f32;
        let origin = Point3::from(origin);

        let mut du = Vector3::new(0.0f32, 0.0, 0.0);
        du[u_axis] = self.width as f32;
        let mut dv = Vector3::new(0.0f32, 0.0, 0.0);
        dv[v_axis] = self.height as f32;

        let (w, h) = (self.width as f32, self.height as f32);

        if self.block_side.is_positive() {
            (
                [origin, origin + du, origin + du + dv, origin + dv],
                [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]],
            )
        } else {
            (
                [origin, origin + dv, origin + du + dv, origin + du],
                [[0.0, 0.0], [0.0, h], [w, h], [w, 0.0]],
            )
        }
    }

    /// The outward normal of the face.
    pub fn normal(&self) -> Vector3<f32> {
        let normal = self.block_side.normal();
        Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32)
    }

    /// Number of unit block faces covered by this rectangle.
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}
