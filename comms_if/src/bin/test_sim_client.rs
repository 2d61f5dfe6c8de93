//! Simple simulator client test
//!
//! Replays a file of simulator frames (one per line) to the drive executable and prints whatever
//! comes back.

use std::{fs, path::PathBuf, thread, time::Duration};

use structopt::StructOpt;

use comms_if::net::{MonitoredSocket, SocketOptions};
use comms_if::sim::Outbound;

#[derive(Debug, StructOpt)]
#[structopt(name = "test_sim_client", about = "Replay simulator frames to the drive executable")]
struct Opts {
    /// File of frames to send, one per line
    #[structopt(parse(from_os_str))]
    frames_file: PathBuf,

    /// Endpoint of the drive executable
    #[structopt(default_value = "tcp://localhost:4567")]
    endpoint: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = Opts::from_args();

    let frames = fs::read_to_string(&opts.frames_file)?;

    // Create the context for zmq
    let ctx = zmq::Context::new();

    let socket_options = SocketOptions {
        linger: 1,
        recv_timeout: 500,
        send_timeout: 500,
        ..Default::default()
    };

    let socket = match MonitoredSocket::new(&ctx, zmq::PAIR, socket_options, &opts.endpoint) {
        Ok(s) => s,
        Err(e) => {
            println!("Could not connect to the drive executable at {}", opts.endpoint);
            return Err(e.into())
        }
    };

    for frame in frames.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Err(e) = socket.send(frame, 0) {
            println!("could not send: {}", e);
            break
        }

        // Frames which are not events get no reply, so a timeout here is normal
        match socket.recv_string(0) {
            Ok(Ok(r)) => {
                println!("{} -> {}", frame, r);

                if r == Outbound::Reset.to_frame() {
                    println!("---- episode reset ----");
                }
            },
            Ok(Err(_)) => println!("{} -> non UTF-8 response", frame),
            Err(zmq::Error::EAGAIN) => println!("{} -> (no response)", frame),
            Err(e) => {
                println!("could not read from the drive executable: {}", e);
                break
            }
        }

        thread::sleep(Duration::from_millis(10));
    }

    Ok(())
}
