/// The verified bytes of one completed piece, ready to be copied into the
/// output buffer at its byte offset.
#[derive(Debug, Clone)]
pub struct PieceResult {
    pub index: u32,
    pub bytes: Vec<u8>,
}

impl PieceResult {
    pub fn new(index: u32, bytes: Vec<u8>) -> Self {
        Self { index, bytes }
    }
}
