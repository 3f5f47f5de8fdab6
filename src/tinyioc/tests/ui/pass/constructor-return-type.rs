use std::convert::Infallible;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use tinyioc::prelude::*;

#[derive(Debug)]
pub struct InvalidBaud(u32);

impl Display for InvalidBaud {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "baud rate {} is not supported", self.0)
    }
}

impl std::error::Error for InvalidBaud {}

pub struct Baud(u32);

#[component]
impl Baud {
    #[inject]
    pub fn standard() -> Baud {
        Baud(9600)
    }
}

pub struct SerialPort {
    pub baud: u32,
}

#[component]
impl SerialPort {
    #[inject]
    pub fn closed() -> Self {
        Self { baud: 0 }
    }

    #[inject]
    pub fn open(baud: Arc<Baud>) -> Result<Self, InvalidBaud> {
        match baud.0 {
            0 => Err(InvalidBaud(0)),
            rate => Ok(Self { baud: rate }),
        }
    }
}

pub struct Modem {
    pub port: Arc<SerialPort>,
}

#[component]
impl Modem {
    #[inject]
    pub fn dial(port: Arc<SerialPort>) -> Result<Modem, Infallible> {
        Ok(Modem { port })
    }

    #[inject]
    pub fn redial(port: Arc<SerialPort>, _baud: Arc<Baud>) -> std::result::Result<Self, InvalidBaud> {
        Ok(Self { port })
    }
}

fn main() {
    let mut container = Container::new();
    container.register_component::<Modem, Modem>().unwrap();
    container.register_component::<SerialPort, SerialPort>().unwrap();
    container.register_component::<Baud, Baud>().unwrap();

    let modem = container.resolve::<Modem>().ok().unwrap();
    assert_eq!(modem.port.baud, 9600);
}
