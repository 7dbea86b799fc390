use crate::common::*;

/// The generic rectangle.
///
/// Coordinates follow the image convention: `t`/`b` are rows growing
/// downwards, `l`/`r` are columns growing to the right.
pub trait Rect {
    type Type;

    fn t(&self) -> Self::Type;
    fn l(&self) -> Self::Type;
    fn b(&self) -> Self::Type;
    fn r(&self) -> Self::Type;
    fn cy(&self) -> Self::Type;
    fn cx(&self) -> Self::Type;
    fn h(&self) -> Self::Type;
    fn w(&self) -> Self::Type;

    fn try_from_tlbr(tlbr: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_tlhw(tlhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;

    fn try_from_cycxhw(cycxhw: [Self::Type; 4]) -> Result<Self>
    where
        Self: Sized;
}

pub trait RectNum: Rect
where
    Self::Type: Num + PartialOrd,
{
    fn cycxhw(&self) -> [Self::Type; 4] {
        [self.cy(), self.cx(), self.h(), self.w()]
    }

    fn tlbr(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.b(), self.r()]
    }

    fn tlhw(&self) -> [Self::Type; 4] {
        [self.t(), self.l(), self.h(), self.w()]
    }

    /// Corners in Pascal VOC order, `[xmin, ymin, xmax, ymax]`.
    fn xyxy(&self) -> [Self::Type; 4] {
        [self.l(), self.t(), self.r(), self.b()]
    }

    /// Returns true if `other` lies entirely inside this rectangle.
    ///
    /// Shared edges count as inside.
    fn contains<R>(&self, other: &R) -> bool
    where
        R: Rect<Type = Self::Type>,
    {
        other.t() >= self.t()
            && other.l() >= self.l()
            && other.b() <= self.b()
            && other.r() <= self.r()
    }
}

impl<T> RectNum for T
where
    T: Rect,
    T::Type: Num + PartialOrd,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TLBR;

    #[test]
    fn contains_is_inclusive_on_edges() {
        let outer = TLBR::try_from_tlbr([0, 0, 240, 320]).unwrap();
        let inner = TLBR::try_from_tlbr([10, 10, 200, 300]).unwrap();
        let edge = TLBR::try_from_tlbr([0, 0, 240, 320]).unwrap();
        let straddle = TLBR::try_from_tlbr([10, 300, 200, 340]).unwrap();

        assert!(outer.contains(&inner));
        assert!(outer.contains(&edge));
        assert!(!outer.contains(&straddle));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn xyxy_order() {
        let rect = TLBR::try_from_tlbr([1, 2, 3, 4]).unwrap();
        assert_eq!(rect.xyxy(), [2, 1, 4, 3]);
        assert_eq!(rect.tlhw(), [1, 2, 2, 2]);
    }
}
