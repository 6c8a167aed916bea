//! Fixture rows loaded by the seed route.

use chrono::NaiveDate;

use crate::structs::InvoiceStatus;

pub struct PlaceholderUser {
    pub id: Option<&'static str>,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub struct PlaceholderCustomer {
    pub id: Option<&'static str>,
    pub name: &'static str,
    pub email: &'static str,
    pub image_url: &'static str,
}

pub struct PlaceholderInvoice {
    pub customer_id: &'static str,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: (i32, u32, u32),
}

impl PlaceholderInvoice {
    pub fn date(&self) -> Option<NaiveDate> {
        let (y, m, d) = self.date;
        NaiveDate::from_ymd_opt(y, m, d)
    }
}

pub struct PlaceholderRevenue {
    pub month: &'static str,
    pub revenue: i64,
}

const EVIL_RABBIT: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";
const DELBA: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";
const LEE: &str = "3958dc9e-742f-4377-85e9-fec4b6a6442a";
const MICHAEL: &str = "76d65c26-f784-44a2-ac19-586678f7c2f2";
const AMY: &str = "cc27c14a-0acf-4f4a-a6c9-d45682c144b9";
const BALAZS: &str = "13d07535-c59e-4157-a011-f8d2ef4e0cbb";

pub const USERS: &[PlaceholderUser] = &[PlaceholderUser {
    id: Some("410544b2-4001-4271-9855-fec4b6a6442a"),
    name: "User",
    email: "user@nextmail.com",
    password: "123456",
}];

pub const CUSTOMERS: &[PlaceholderCustomer] = &[
    PlaceholderCustomer {
        id: Some(EVIL_RABBIT),
        name: "Evil Rabbit",
        email: "evil@rabbit.com",
        image_url: "/customers/evil-rabbit.png",
    },
    PlaceholderCustomer {
        id: Some(DELBA),
        name: "Delba de Oliveira",
        email: "delba@oliveira.com",
        image_url: "/customers/delba-de-oliveira.png",
    },
    PlaceholderCustomer {
        id: Some(LEE),
        name: "Lee Robinson",
        email: "lee@robinson.com",
        image_url: "/customers/lee-robinson.png",
    },
    PlaceholderCustomer {
        id: Some(MICHAEL),
        name: "Michael Novotny",
        email: "michael@novotny.com",
        image_url: "/customers/michael-novotny.png",
    },
    PlaceholderCustomer {
        id: Some(AMY),
        name: "Amy Burns",
        email: "amy@burns.com",
        image_url: "/customers/amy-burns.png",
    },
    PlaceholderCustomer {
        id: Some(BALAZS),
        name: "Balazs Orban",
        email: "balazs@orban.com",
        image_url: "/customers/balazs-orban.png",
    },
];

macro_rules! invoice {
    ($customer:expr, $amount:expr, $status:ident, $y:expr, $m:expr, $d:expr) => {
        PlaceholderInvoice {
            customer_id: $customer,
            amount: $amount,
            status: InvoiceStatus::$status,
            date: ($y, $m, $d),
        }
    };
}

pub const INVOICES: &[PlaceholderInvoice] = &[
    invoice!(EVIL_RABBIT, 15795, Pending, 2022, 12, 6),
    invoice!(DELBA, 20348, Pending, 2022, 11, 14),
    invoice!(AMY, 3040, Paid, 2022, 10, 29),
    invoice!(MICHAEL, 44800, Paid, 2023, 9, 10),
    invoice!(BALAZS, 34577, Pending, 2023, 8, 5),
    invoice!(LEE, 54246, Pending, 2023, 7, 16),
    invoice!(EVIL_RABBIT, 666, Pending, 2023, 6, 27),
    invoice!(MICHAEL, 32545, Paid, 2023, 6, 9),
    invoice!(AMY, 1250, Paid, 2023, 6, 17),
    invoice!(BALAZS, 8546, Paid, 2023, 6, 7),
    invoice!(DELBA, 500, Paid, 2023, 8, 19),
    invoice!(BALAZS, 8945, Paid, 2023, 6, 3),
    invoice!(LEE, 1000, Paid, 2022, 6, 5),
];

pub const REVENUE: &[PlaceholderRevenue] = &[
    PlaceholderRevenue { month: "Jan", revenue: 2000 },
    PlaceholderRevenue { month: "Feb", revenue: 1800 },
    PlaceholderRevenue { month: "Mar", revenue: 2200 },
    PlaceholderRevenue { month: "Apr", revenue: 2500 },
    PlaceholderRevenue { month: "May", revenue: 2300 },
    PlaceholderRevenue { month: "Jun", revenue: 3200 },
    PlaceholderRevenue { month: "Jul", revenue: 3500 },
    PlaceholderRevenue { month: "Aug", revenue: 3700 },
    PlaceholderRevenue { month: "Sep", revenue: 2500 },
    PlaceholderRevenue { month: "Oct", revenue: 2800 },
    PlaceholderRevenue { month: "Nov", revenue: 3000 },
    PlaceholderRevenue { month: "Dec", revenue: 4800 },
];
