use clap::Parser;
use tokio::net::TcpStream;

use nal_test_server::config::schema::DEFAULT_BIND_ADDRESS;
use nal_test_server::lifecycle::signals;
use nal_test_server::observability::init_logging;
use nal_test_server::receiver::receive_units;

#[derive(Parser)]
#[command(name = "nal-receiver")]
#[command(about = "Connects to the test server and logs every NAL unit it receives", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    addr: String,

    /// Stop after this many units.
    #[arg(short, long)]
    max_units: Option<u64>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    tracing::info!(addr = %cli.addr, "Connecting");
    let mut stream = TcpStream::connect(&cli.addr).await?;
    stream.set_nodelay(true)?;
    tracing::info!("Connected");

    tokio::select! {
        result = receive_units(&mut stream, cli.max_units) => {
            let report = result?;
            tracing::info!(
                bytes_received = report.bytes_received,
                units = report.units,
                sps = report.sps,
                pps = report.pps,
                idr = report.idr,
                non_idr = report.non_idr,
                other = report.other,
                "Receive loop ended"
            );
        }
        _ = signals::wait_for_shutdown_signal() => {
            tracing::info!("Disconnecting");
        }
    }

    Ok(())
}
