/// A random-access sequence of symbols that can be aligned.
pub trait Alignable {
    type Symbol;

    fn len(&self) -> usize;

    fn at(&self, pos: usize) -> &Self::Symbol;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all symbols in order.
    fn symbols(&self) -> impl Iterator<Item = &Self::Symbol> + '_ {
        (0..self.len()).map(move |pos| self.at(pos))
    }
}

impl<T> Alignable for [T] {
    type Symbol = T;

    #[inline(always)]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline(always)]
    fn at(&self, pos: usize) -> &Self::Symbol {
        &self[pos]
    }
}

impl<T> Alignable for Vec<T> {
    type Symbol = T;

    #[inline(always)]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline(always)]
    fn at(&self, pos: usize) -> &Self::Symbol {
        &self[pos]
    }
}

impl<A: Alignable + ?Sized> Alignable for &A {
    type Symbol = A::Symbol;

    #[inline(always)]
    fn len(&self) -> usize {
        (**self).len()
    }

    #[inline(always)]
    fn at(&self, pos: usize) -> &Self::Symbol {
        (**self).at(pos)
    }
}
