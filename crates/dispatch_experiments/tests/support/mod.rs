#![allow(dead_code)]

use std::fs;
use std::path::Path;

use dispatch_experiments::input::{
    DEFAULT_DISPATCH_WAYBILL_FILE, DEFAULT_RIDER_SNAPSHOT_FILE, DEFAULT_WAYBILL_FILE,
};

/// Orders 1-3 wait at t=1000, order 4 at t=1060. Order 3 is missing from the
/// waybill table and order 2 is listed twice at t=1000. Courier 12 starts with
/// a load.
pub const WAYBILLS: &str = "\
order_id,da_id,sender_lat,sender_lng,recipient_lat,recipient_lng,courier_id,platform_order_time,grab_time
1,0,100,0,150,50,11,940,0
2,0,0,100,50,150,13,900,0
4,0,500,500,550,550,11,1000,0
2,0,999,999,999,999,99,1,0
";

pub const RIDER_SNAPSHOTS: &str = "\
dispatch_time,courier_id,rider_lat,rider_lng,courier_waybills
1000,11,0,0,[]
1000,12,1000,1000,[77]
1000,13,1000,0,
1060,11,150,50,[1]
";

pub const DISPATCH_WAYBILLS: &str = "\
dispatch_time,order_id
1000,1
1000,2
1000,3
1000,2
1060,4
";

pub fn write_fixture(dir: &Path) {
    fs::write(dir.join(DEFAULT_WAYBILL_FILE), WAYBILLS).expect("write waybills");
    fs::write(dir.join(DEFAULT_RIDER_SNAPSHOT_FILE), RIDER_SNAPSHOTS).expect("write riders");
    fs::write(dir.join(DEFAULT_DISPATCH_WAYBILL_FILE), DISPATCH_WAYBILLS)
        .expect("write dispatch waybills");
}
