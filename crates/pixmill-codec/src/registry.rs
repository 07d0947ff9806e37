//! Format-keyed codec registry.
//!
//! The registry is a plain value: the embedding application constructs
//! one, registers whatever codecs it links, and passes it wherever
//! decoding or encoding happens. There is no process-global instance and
//! no load-time registration — what is in the registry is exactly what
//! was put there.
//!
//! # Example
//!
//! ```rust
//! use pixmill_codec::{Codec, CodecOptions, CodecRegistry, Decoded};
//!
//! let mut registry = CodecRegistry::new();
//! registry.register(
//!     "image/gray",
//!     Codec::new().with_decoder(|bytes, _opts| {
//!         // a toy 1xN grayscale format: one byte per pixel
//!         let data = bytes.iter().flat_map(|&v| [v, v, v, 255]).collect();
//!         Ok(Decoded {
//!             width: bytes.len() as u32,
//!             height: 1,
//!             data,
//!         })
//!     }),
//! );
//!
//! let buf = registry
//!     .decode("image/gray", &[0, 128, 255], &CodecOptions::new())
//!     .unwrap();
//! assert_eq!(buf.dimensions(), (3, 1));
//! ```

use std::collections::HashMap;

use pixmill_core::PixelBuffer;

use crate::{BoxError, CodecError, CodecResult};

/// Raw RGBA8 image produced by a decoder.
///
/// The registry validates `data.len() == width * height * 4` when bridging
/// into a [`PixelBuffer`]; decoders need not (and cannot) bypass that
/// check.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA8 bytes
    pub data: Vec<u8>,
}

/// Codec-specific options, passed through to callbacks untouched.
///
/// The registry attaches no meaning to the entries; keys and values are
/// whatever the codec on the other side documents.
#[derive(Debug, Clone, Default)]
pub struct CodecOptions {
    entries: HashMap<String, String>,
}

impl CodecOptions {
    /// Creates an empty option bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an option, replacing any previous value for the key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Returns the value for a key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns `true` if no options are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Decoder callback: encoded bytes plus options to raw RGBA8.
pub type DecodeFn = dyn Fn(&[u8], &CodecOptions) -> Result<Decoded, BoxError> + Send + Sync;

/// Encoder callback: dimensions, raw RGBA8 bytes and options to encoded
/// bytes.
pub type EncodeFn =
    dyn Fn(u32, u32, &[u8], &CodecOptions) -> Result<Vec<u8>, BoxError> + Send + Sync;

/// A registered codec: either half may be absent for decode-only or
/// encode-only formats.
#[derive(Default)]
pub struct Codec {
    decode: Option<Box<DecodeFn>>,
    encode: Option<Box<EncodeFn>>,
}

impl Codec {
    /// Creates a codec with no capabilities; attach them with
    /// [`with_decoder`](Self::with_decoder) and
    /// [`with_encoder`](Self::with_encoder).
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a decoder callback.
    pub fn with_decoder<F>(mut self, decode: F) -> Self
    where
        F: Fn(&[u8], &CodecOptions) -> Result<Decoded, BoxError> + Send + Sync + 'static,
    {
        self.decode = Some(Box::new(decode));
        self
    }

    /// Attaches an encoder callback.
    pub fn with_encoder<F>(mut self, encode: F) -> Self
    where
        F: Fn(u32, u32, &[u8], &CodecOptions) -> Result<Vec<u8>, BoxError> + Send + Sync + 'static,
    {
        self.encode = Some(Box::new(encode));
        self
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec")
            .field("decode", &self.decode.is_some())
            .field("encode", &self.encode.is_some())
            .finish()
    }
}

/// Format-keyed mapping from identifier to codec callbacks.
///
/// Format identifiers are opaque strings; MIME types are the conventional
/// choice. Lookups are exact — no sniffing, no extension matching.
#[derive(Debug, Default)]
pub struct CodecRegistry {
    codecs: HashMap<String, Codec>,
}

impl CodecRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a codec for a format, replacing any previous entry.
    pub fn register(&mut self, format: impl Into<String>, codec: Codec) {
        self.codecs.insert(format.into(), codec);
    }

    /// Returns an iterator over registered format identifiers.
    pub fn formats(&self) -> impl Iterator<Item = &str> {
        self.codecs.keys().map(String::as_str)
    }

    /// Returns `true` if a decoder is registered for the format.
    pub fn supports_decode(&self, format: &str) -> bool {
        self.codecs
            .get(format)
            .is_some_and(|codec| codec.decode.is_some())
    }

    /// Returns `true` if an encoder is registered for the format.
    pub fn supports_encode(&self, format: &str) -> bool {
        self.codecs
            .get(format)
            .is_some_and(|codec| codec.encode.is_some())
    }

    /// Decodes encoded bytes into a [`PixelBuffer`].
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingCodec`] if no decoder is registered for the
    /// format; [`CodecError::Decode`] wrapping the codec's own failure;
    /// [`CodecError::Shape`] if the decoder's reported dimensions disagree
    /// with the data it produced.
    pub fn decode(
        &self,
        format: &str,
        bytes: &[u8],
        options: &CodecOptions,
    ) -> CodecResult<PixelBuffer> {
        let decoder = self
            .codecs
            .get(format)
            .and_then(|codec| codec.decode.as_deref())
            .ok_or_else(|| CodecError::MissingCodec(format.to_string()))?;

        let decoded = decoder(bytes, options).map_err(|source| CodecError::Decode {
            format: format.to_string(),
            source,
        })?;

        Ok(PixelBuffer::from_vec(
            decoded.width,
            decoded.height,
            decoded.data,
        )?)
    }

    /// Encodes a [`PixelBuffer`] into the format's byte representation.
    ///
    /// # Errors
    ///
    /// [`CodecError::MissingCodec`] if no encoder is registered for the
    /// format; [`CodecError::Encode`] wrapping the codec's own failure.
    pub fn encode(
        &self,
        format: &str,
        buffer: &PixelBuffer,
        options: &CodecOptions,
    ) -> CodecResult<Vec<u8>> {
        let encoder = self
            .codecs
            .get(format)
            .and_then(|codec| codec.encode.as_deref())
            .ok_or_else(|| CodecError::MissingCodec(format.to_string()))?;

        encoder(buffer.width(), buffer.height(), buffer.as_raw(), options).map_err(|source| {
            CodecError::Encode {
                format: format.to_string(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Toy format: 8-byte LE header (width, height) followed by raw RGBA.
    fn raw_codec() -> Codec {
        Codec::new()
            .with_decoder(|bytes, _opts| {
                if bytes.len() < 8 {
                    return Err("truncated header".into());
                }
                let width = u32::from_le_bytes(bytes[0..4].try_into()?);
                let height = u32::from_le_bytes(bytes[4..8].try_into()?);
                Ok(Decoded {
                    width,
                    height,
                    data: bytes[8..].to_vec(),
                })
            })
            .with_encoder(|width, height, data, _opts| {
                let mut out = Vec::with_capacity(8 + data.len());
                out.extend_from_slice(&width.to_le_bytes());
                out.extend_from_slice(&height.to_le_bytes());
                out.extend_from_slice(data);
                Ok(out)
            })
    }

    #[test]
    fn test_missing_codec_names_format() {
        let registry = CodecRegistry::new();
        let err = registry
            .decode("image/png", &[], &CodecOptions::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingCodec(ref f) if f == "image/png"));
        assert!(err.to_string().contains("image/png"));
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let mut registry = CodecRegistry::new();
        registry.register("image/raw", raw_codec());

        let buf = PixelBuffer::filled(2, 2, [1, 2, 3, 4]);
        let bytes = registry
            .encode("image/raw", &buf, &CodecOptions::new())
            .unwrap();
        let back = registry
            .decode("image/raw", &bytes, &CodecOptions::new())
            .unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_decoder_failure_is_wrapped() {
        let mut registry = CodecRegistry::new();
        registry.register("image/raw", raw_codec());

        let err = registry
            .decode("image/raw", &[1, 2, 3], &CodecOptions::new())
            .unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(msg.contains("image/raw"));
        assert!(msg.contains("truncated header"));
    }

    #[test]
    fn test_lying_decoder_hits_shape_check() {
        let mut registry = CodecRegistry::new();
        registry.register(
            "image/bogus",
            Codec::new().with_decoder(|_bytes, _opts| {
                Ok(Decoded {
                    width: 10,
                    height: 10,
                    data: vec![0; 4], // nowhere near 10*10*4
                })
            }),
        );

        let err = registry
            .decode("image/bogus", &[], &CodecOptions::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::Shape(_)));
    }

    #[test]
    fn test_decode_only_codec() {
        let mut registry = CodecRegistry::new();
        registry.register(
            "image/readonly",
            Codec::new().with_decoder(|_bytes, _opts| {
                Ok(Decoded {
                    width: 1,
                    height: 1,
                    data: vec![0; 4],
                })
            }),
        );

        assert!(registry.supports_decode("image/readonly"));
        assert!(!registry.supports_encode("image/readonly"));

        let buf = PixelBuffer::new(1, 1);
        let err = registry
            .encode("image/readonly", &buf, &CodecOptions::new())
            .unwrap_err();
        assert!(matches!(err, CodecError::MissingCodec(_)));
    }

    #[test]
    fn test_options_reach_the_codec() {
        let mut registry = CodecRegistry::new();
        registry.register(
            "image/opt",
            Codec::new().with_encoder(|_w, _h, _data, opts| {
                match opts.get("quality") {
                    Some(q) => Ok(q.as_bytes().to_vec()),
                    None => Err("quality option required".into()),
                }
            }),
        );

        let buf = PixelBuffer::new(1, 1);
        let opts = CodecOptions::new().set("quality", "90");
        assert_eq!(
            registry.encode("image/opt", &buf, &opts).unwrap(),
            b"90".to_vec()
        );
        assert!(registry.encode("image/opt", &buf, &CodecOptions::new()).is_err());
    }
}
