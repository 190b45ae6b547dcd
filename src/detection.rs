use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Xywh};
use crate::label::ObjectClass;

/// One candidate region from the external detector feed.
/// Contains (x,y) of the center and (width,height) of bbox.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct Detection {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(rename = "p")]
    pub confidence: f32,
    #[serde(rename = "c")]
    pub class: ObjectClass,
}

impl Detection {
    pub fn new(x: f32, y: f32, w: f32, h: f32, confidence: f32, class: ObjectClass) -> Self {
        Self {
            x,
            y,
            w,
            h,
            confidence,
            class,
        }
    }

    #[inline(always)]
    pub fn bbox(&self) -> BBox<Xywh> {
        BBox::xywh(self.x, self.y, self.w, self.h)
    }

    #[inline(always)]
    pub fn center(&self) -> na::Point2<f32> {
        na::Point2::new(self.x, self.y)
    }

    #[inline(always)]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }
}
