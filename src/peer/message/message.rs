use std::io::{self, Read, Write};

/// IDs of the messages defined in the protocol. Any byte not listed here is
/// decoded as `Unknown` and tolerated by the session (non-fatal).
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MessageId {
    Choke,
    Unchoke,
    Interested,
    NotInterested,
    Have,
    Bitfield,
    Request,
    Piece,
    Cancel,
    Port,
    Unknown(u8),
}

impl MessageId {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0 => MessageId::Choke,
            1 => MessageId::Unchoke,
            2 => MessageId::Interested,
            3 => MessageId::NotInterested,
            4 => MessageId::Have,
            5 => MessageId::Bitfield,
            6 => MessageId::Request,
            7 => MessageId::Piece,
            8 => MessageId::Cancel,
            9 => MessageId::Port,
            other => MessageId::Unknown(other),
        }
    }

    fn as_byte(&self) -> u8 {
        match self {
            MessageId::Choke => 0,
            MessageId::Unchoke => 1,
            MessageId::Interested => 2,
            MessageId::NotInterested => 3,
            MessageId::Have => 4,
            MessageId::Bitfield => 5,
            MessageId::Request => 6,
            MessageId::Piece => 7,
            MessageId::Cancel => 8,
            MessageId::Port => 9,
            MessageId::Unknown(b) => *b,
        }
    }
}

/// A framed peer wire message: a 1-byte ID plus its body.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: MessageId,
    pub payload: Vec<u8>,
}

/// The result of reading one frame off the wire: either a real message or a
/// keep-alive (zero-length frame, not a first-class message).
#[derive(Debug)]
pub enum Frame {
    KeepAlive,
    Message(Message),
}

impl Message {
    pub fn new(id: MessageId, payload: Vec<u8>) -> Self {
        Self { id, payload }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.payload.len() + 1;
        let mut bytes = Vec::with_capacity(4 + len);
        bytes.extend_from_slice(&(len as u32).to_be_bytes());
        bytes.push(self.id.as_byte());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes())
    }

    /// Reads one frame from the stream: a 4-byte big-endian length prefix
    /// followed by that many bytes. A length of zero is a keep-alive.
    pub fn read_frame<R: Read>(reader: &mut R) -> io::Result<Frame> {
        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes)?;
        let len = u32::from_be_bytes(len_bytes);

        if len == 0 {
            return Ok(Frame::KeepAlive);
        }

        let mut body = vec![0u8; len as usize];
        reader.read_exact(&mut body)?;

        let id = MessageId::from_byte(body[0]);
        let payload = body[1..].to_vec();
        Ok(Frame::Message(Message::new(id, payload)))
    }
}

/// Payload of a REQUEST or CANCEL message: which piece, at what offset, how
/// many bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub index: u32,
    pub begin: u32,
    pub length: u32,
}

#[derive(Debug, PartialEq)]
pub enum RequestError {
    InvalidLength,
}

impl Request {
    pub fn new(index: u32, begin: u32, length: u32) -> Self {
        Self {
            index,
            begin,
            length,
        }
    }

    pub fn to_bytes(&self) -> [u8; 12] {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&self.index.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.begin.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.length.to_be_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RequestError> {
        if bytes.len() != 12 {
            return Err(RequestError::InvalidLength);
        }
        let index = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
        let begin = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
        let length = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
        Ok(Self {
            index,
            begin,
            length,
        })
    }
}

/// Payload of a PIECE message: which piece, at what offset, the block data.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceBlock {
    pub index: u32,
    pub begin: u32,
    pub data: Vec<u8>,
}

#[derive(Debug, PartialEq)]
pub enum PieceBlockError {
    TooShort,
}

impl PieceBlock {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(8 + self.data.len());
        bytes.extend_from_slice(&self.index.to_be_bytes());
        bytes.extend_from_slice(&self.begin.to_be_bytes());
        bytes.extend_from_slice(&self.data);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PieceBlockError> {
        if bytes.len() < 8 {
            return Err(PieceBlockError::TooShort);
        }
        let index = u32::from_be_bytes(bytes[0..4].try_into().unwrap());
        let begin = u32::from_be_bytes(bytes[4..8].try_into().unwrap());
        Ok(Self {
            index,
            begin,
            data: bytes[8..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_message_roundtrip_via_frame() {
        let msg = Message::new(MessageId::Interested, vec![]);
        let bytes = msg.to_bytes();

        let mut cursor = Cursor::new(bytes);
        match Message::read_frame(&mut cursor).unwrap() {
            Frame::Message(parsed) => {
                assert_eq!(parsed.id, MessageId::Interested);
                assert_eq!(parsed.payload, Vec::<u8>::new());
            }
            Frame::KeepAlive => panic!("expected a message"),
        }
    }

    #[test]
    fn test_keep_alive_frame() {
        let bytes = 0u32.to_be_bytes().to_vec();
        let mut cursor = Cursor::new(bytes);
        assert!(matches!(
            Message::read_frame(&mut cursor).unwrap(),
            Frame::KeepAlive
        ));
    }

    #[test]
    fn test_unknown_message_id_is_tolerated() {
        let msg = Message::new(MessageId::Unknown(200), vec![1, 2, 3]);
        let bytes = msg.to_bytes();

        let mut cursor = Cursor::new(bytes);
        match Message::read_frame(&mut cursor).unwrap() {
            Frame::Message(parsed) => {
                assert_eq!(parsed.id, MessageId::Unknown(200));
                assert_eq!(parsed.payload, vec![1, 2, 3]);
            }
            Frame::KeepAlive => panic!("expected a message"),
        }
    }

    #[test]
    fn test_request_roundtrip() {
        let request = Request::new(1, 16384, 16384);
        let bytes = request.to_bytes();
        assert_eq!(Request::from_bytes(&bytes).unwrap(), request);
    }

    #[test]
    fn test_piece_block_roundtrip() {
        let block = PieceBlock {
            index: 3,
            begin: 16384,
            data: vec![9, 9, 9],
        };
        let bytes = block.to_bytes();
        assert_eq!(PieceBlock::from_bytes(&bytes).unwrap(), block);
    }
}
