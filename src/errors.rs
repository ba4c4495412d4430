use core::fmt;

/// Failure modes surfaced by the NAXOS layers to a caller.
///
/// Mirrors the upstream C implementation's `-1..-5` return codes (see
/// `Naxos.h`), but as a typed enum instead of bare integers so callers can
/// match on the reason a handshake was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested curve is not wired up at the protocol layer (P-192).
    UnsupportedCurve,
    /// A peer's static public key coordinate was not reduced mod p.
    PeerStaticKeyNotReduced,
    /// A peer's static public key does not lie on the curve.
    PeerStaticKeyOffCurve,
    /// A peer's ephemeral public key coordinate was not reduced mod p.
    PeerEphemeralNotReduced,
    /// A peer's ephemeral public key does not lie on the curve.
    PeerEphemeralOffCurve,
    /// The hash collaborator reported failure, or a point this party
    /// derived itself (never peer-supplied) landed off the curve.
    InternalFault,
    /// The OS entropy source failed to fill a buffer.
    EntropyFailure,
    /// Ephemeral-key generation kept landing on the identity hash input.
    ZeroHashRetryExhausted,
    /// A party identifier is longer than the curve's fixed coordinate
    /// byte length and cannot be framed unambiguously.
    IdentifierTooLong,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::UnsupportedCurve => "curve is not supported at the protocol layer",
            Error::PeerStaticKeyNotReduced => "peer static key coordinate is not reduced mod p",
            Error::PeerStaticKeyOffCurve => "peer static key is not on the curve",
            Error::PeerEphemeralNotReduced => "peer ephemeral coordinate is not reduced mod p",
            Error::PeerEphemeralOffCurve => "peer ephemeral key is not on the curve",
            Error::InternalFault => "hash collaborator reported failure or derived point is off-curve",
            Error::EntropyFailure => "entropy source failed",
            Error::ZeroHashRetryExhausted => "ephemeral generation kept hashing to zero",
            Error::IdentifierTooLong => "party identifier exceeds the curve's coordinate byte length",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}
