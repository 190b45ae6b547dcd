use nalgebra as na;
use serde::{Deserialize, Serialize};
use serde_derive::{Deserialize, Serialize};
use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-width-height format, contains left top corner and width-height
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltwh;
impl BBoxFormat for Ltwh {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

/// X-y-width-height format, contains coordinates of the center of bbox and width-height
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub struct Xywh;
impl BBoxFormat for Xywh {}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BBox<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq>(
    [f32; 4],
    PhantomData<F>,
);

impl<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq + Clone> Copy for BBox<F> {}

impl<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat + Serialize + Deserialize<'static> + PartialEq> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }
}

impl BBox<Ltwh> {
    #[inline]
    pub fn ltwh(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.0[2] * self.0[3]
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.area() == 0.0
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.0[0] + self.0[2] / 2.0, self.0[1] + self.0[3] / 2.0)
    }

    /// Area of the overlap with `other`, zero when the boxes are disjoint.
    pub fn intersection_area(&self, other: &BBox<Ltwh>) -> f32 {
        let a = self.as_ltrb();
        let b = other.as_ltrb();

        let iw = (a.right().min(b.right()) - a.left().max(b.left())).max(0.0);
        let ih = (a.bottom().min(b.bottom()) - a.top().max(b.top())).max(0.0);

        iw * ih
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }

    #[inline]
    pub fn as_xywh(&self) -> BBox<Xywh> {
        self.into()
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline]
    pub fn as_ltwh(&self) -> BBox<Ltwh> {
        self.into()
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }
}

impl BBox<Xywh> {
    #[inline]
    pub fn xywh(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline(always)]
    pub fn cx(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn cy(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.0[2] * self.0[3]
    }

    #[inline]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.0[0], self.0[1])
    }

    #[inline]
    pub fn as_ltwh(&self) -> BBox<Ltwh> {
        self.into()
    }
}

impl<'a> From<&'a BBox<Ltwh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[2] + v.0[0], v.0[3] + v.0[1]],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Ltrb>> for BBox<Ltwh> {
    #[inline]
    fn from(v: &'a BBox<Ltrb>) -> Self {
        Self(
            [v.0[0], v.0[1], v.0[2] - v.0[0], v.0[3] - v.0[1]],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Ltwh>> for BBox<Xywh> {
    #[inline]
    fn from(v: &'a BBox<Ltwh>) -> Self {
        Self(
            [
                v.0[0] + v.0[2] / 2.0,
                v.0[1] + v.0[3] / 2.0,
                v.0[2],
                v.0[3],
            ],
            Default::default(),
        )
    }
}

impl<'a> From<&'a BBox<Xywh>> for BBox<Ltwh> {
    #[inline]
    fn from(v: &'a BBox<Xywh>) -> Self {
        Self(
            [
                v.0[0] - v.0[2] / 2.0,
                v.0[1] - v.0[3] / 2.0,
                v.0[2],
                v.0[3],
            ],
            Default::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_ltwh_roundtrip() {
        let b = BBox::ltwh(10.0, 20.0, 30.0, 40.0);
        let back = b.as_ltrb().as_ltwh();

        assert_abs_diff_eq!(b.left(), back.left());
        assert_abs_diff_eq!(b.top(), back.top());
        assert_abs_diff_eq!(b.width(), back.width());
        assert_abs_diff_eq!(b.height(), back.height());
    }

    #[test]
    fn test_center_and_area() {
        let b = BBox::ltwh(0.0, 0.0, 10.0, 10.0);

        assert_abs_diff_eq!(b.area(), 100.0);
        assert_abs_diff_eq!(b.center().x, 5.0);
        assert_abs_diff_eq!(b.center().y, 5.0);
    }

    #[test]
    fn test_intersection_area() {
        let a = BBox::ltwh(0.0, 0.0, 10.0, 10.0);
        let b = BBox::ltwh(5.0, 5.0, 10.0, 10.0);
        let c = BBox::ltwh(20.0, 20.0, 5.0, 5.0);

        assert_abs_diff_eq!(a.intersection_area(&b), 25.0);
        assert_abs_diff_eq!(b.intersection_area(&a), 25.0);
        assert_abs_diff_eq!(a.intersection_area(&c), 0.0);
        assert_abs_diff_eq!(a.intersection_area(&a), 100.0);
    }

    #[test]
    fn test_degenerate() {
        assert!(BBox::ltwh(1.0, 1.0, 0.0, 5.0).is_degenerate());
        assert!(!BBox::ltwh(1.0, 1.0, 2.0, 5.0).is_degenerate());
    }

    #[test]
    fn test_xywh_conversion() {
        let d = BBox::xywh(50.0, 50.0, 20.0, 10.0);
        let r = d.as_ltwh();

        assert_abs_diff_eq!(r.left(), 40.0);
        assert_abs_diff_eq!(r.top(), 45.0);
        assert_abs_diff_eq!(r.center().x, 50.0);
        assert_abs_diff_eq!(r.center().y, 50.0);
    }
}
