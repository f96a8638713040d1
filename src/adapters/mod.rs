//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements         | Connects to              |
//! |-----------------|--------------------|--------------------------|
//! | `hardware`      | ButtonPort         | ESP32 GPIO (input)       |
//! |                 | LedPort            | ESP32 GPIO (output)      |
//! | `log_sink`      | EventSink          | Serial log output        |
//! | `tcp_transport` | Transport          | TCP socket (lwIP / std)  |
//! | `time`          | ClockPort          | ESP32 system timer       |
//! | `wifi`          | n/a                | ESP-IDF WiFi STA         |

pub mod hardware;
pub mod log_sink;
pub mod tcp_transport;
pub mod time;
pub mod wifi;
