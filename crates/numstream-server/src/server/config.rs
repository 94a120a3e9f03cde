use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;
use numstream::{
    CompressionConfig, DEFAULT_FLUSH_EVERY, DEFAULT_PACED_RECORD_COUNT, DEFAULT_RECORD_COUNT,
    DeflateFormat, FlushPolicy, Framing, SessionConfig,
};

/// Runtime configuration for the `numstream-server` binary.
///
/// These settings control how many records each endpoint streams, how the
/// output is batched and compressed, and how much buffering sits between a
/// session and its connection. All values are parsed from CLI arguments or
/// environment variables, with defaults matching the documented endpoints.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "numstream-server",
    version,
    about = "An HTTP service streaming random-number records as JSON"
)]
pub struct CliArgs {
    /// Number of records in the compressed JSON array download.
    ///
    /// Environment variable: `RECORD_COUNT`
    #[arg(long, env = "RECORD_COUNT", default_value_t = DEFAULT_RECORD_COUNT)]
    pub record_count: usize,

    /// Number of records on the paced NDJSON endpoint.
    ///
    /// Environment variable: `LIVE_RECORD_COUNT`
    #[arg(long, env = "LIVE_RECORD_COUNT", default_value_t = DEFAULT_PACED_RECORD_COUNT)]
    pub live_record_count: usize,

    /// Records encoded between hand-offs to the compressor.
    ///
    /// Larger batches compress better and cost fewer writes; smaller batches
    /// reach the client sooner. The first record is always handed off on its
    /// own.
    ///
    /// Environment variable: `FLUSH_EVERY`
    #[arg(long, env = "FLUSH_EVERY", default_value_t = DEFAULT_FLUSH_EVERY)]
    pub flush_every: usize,

    /// Delay between records on the paced NDJSON endpoint, in milliseconds.
    ///
    /// Environment variable: `PACE_MS`
    #[arg(long, env = "PACE_MS", default_value_t = 500)]
    pub pace_ms: u64,

    /// Deflate compression level, 0 (store) to 9 (best).
    ///
    /// Environment variable: `COMPRESSION_LEVEL`
    #[arg(long, env = "COMPRESSION_LEVEL", default_value_t = 6)]
    pub compression_level: u32,

    /// Container format of the compressed body.
    ///
    /// `zlib` is what HTTP `Content-Encoding: deflate` specifies; `raw` emits
    /// bare deflate blocks for clients that expect them.
    ///
    /// Environment variable: `DEFLATE_FORMAT`
    #[arg(long, env = "DEFLATE_FORMAT", value_enum, default_value_t = FormatArg::Zlib)]
    pub deflate_format: FormatArg,

    /// Sync-flush the compressor after every batch so partial downloads stay
    /// decodable, at the cost of a worse ratio.
    ///
    /// Environment variable: `SYNC_FLUSH`
    #[arg(long, env = "SYNC_FLUSH", default_value_t = false)]
    pub sync_flush: bool,

    /// Capacity of the chunk channel between a session and its connection.
    ///
    /// This is the only buffering between the two. Lower values surface
    /// client backpressure sooner; higher values smooth out bursts.
    ///
    /// Environment variable: `STREAM_BUFFER_SIZE`
    #[arg(long, env = "STREAM_BUFFER_SIZE", default_value_t = 2)]
    pub stream_buffer_size: usize,

    /// Where random numbers come from.
    ///
    /// Environment variable: `ENTROPY`
    #[arg(long, env = "ENTROPY", value_enum, default_value_t = EntropyArg::Thread)]
    pub entropy: EntropyArg,

    /// Seconds to wait for in-flight streams to drain on shutdown.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,

    /// Address to listen on (TCP or Unix socket path; use --uds for Unix socket).
    ///
    /// Example: "0.0.0.0:3000" or "/tmp/numstream.sock"
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:3000"))]
    pub server_addr: String,

    /// Listen on a Unix socket instead of TCP. If set, `SERVER_ADDR` must be a file path.
    #[arg(short, long, default_value_t = false)]
    pub uds: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Zlib,
    Raw,
}

/// Entropy source selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyArg {
    /// Thread-local CSPRNG, reseeded from the OS.
    Thread,
    /// Read every number from the OS directly.
    Os,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub record_count: usize,
    pub live_record_count: usize,
    pub stream_buffer_size: usize,
    pub entropy: EntropyArg,
    pub shutdown_timeout: Duration,
    pub download: SessionConfig,
    pub live: SessionConfig,
    pub server_addr: String,
    pub uds: bool,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.flush_every == 0 {
            bail!("FLUSH_EVERY must be greater than 0");
        }

        if args.stream_buffer_size == 0 {
            bail!("STREAM_BUFFER_SIZE must be greater than 0");
        }

        if args.compression_level > 9 {
            bail!(
                "COMPRESSION_LEVEL ({}) must be between 0 and 9",
                args.compression_level
            );
        }

        let compression = CompressionConfig {
            format: match args.deflate_format {
                FormatArg::Zlib => DeflateFormat::Zlib,
                FormatArg::Raw => DeflateFormat::Raw,
            },
            level: args.compression_level,
            flush: if args.sync_flush {
                FlushPolicy::Sync
            } else {
                FlushPolicy::None
            },
        };

        let download = SessionConfig {
            framing: Framing::PrettyArray,
            compression: Some(compression),
            flush_every: args.flush_every,
            pace: Duration::ZERO,
        };

        let live = SessionConfig {
            pace: Duration::from_millis(args.pace_ms),
            ..SessionConfig::paced_lines()
        };

        Ok(Self {
            record_count: args.record_count,
            live_record_count: args.live_record_count,
            stream_buffer_size: args.stream_buffer_size,
            entropy: args.entropy,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
            download,
            live,
            server_addr: args.server_addr,
            uds: args.uds,
        })
    }
}
