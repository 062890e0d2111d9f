use crate::error::Result;

/// One blocking request/reply exchange with the controller.
///
/// Implementations send the entire request, then block for the reply up
/// to their configured timeout. The bytes handed in and out are raw
/// protocol frames; the serial implementation applies the escape layer
/// internally so both transports look identical to the dispatcher.
pub trait Exchange {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>>;
}

impl<T: Exchange + ?Sized> Exchange for &mut T {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        (**self).exchange(request)
    }
}

impl<T: Exchange + ?Sized> Exchange for Box<T> {
    fn exchange(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        (**self).exchange(request)
    }
}
