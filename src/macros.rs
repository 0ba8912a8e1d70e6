/**********************************************
  > File Name		: macros.rs
  > Author		    : lunar
  > Email			: lunar_ubuntu@qq.com
  > Created Time	: Fri 14 May 2021 10:34:16 AM CST
  > Location        : Shanghai
  > Copyright@ https://github.com/xiaoqixian
 **********************************************/

//return InvalidArgument if the condition does not hold.
#[macro_export]
macro_rules! ensure_arg {
    ($cond: expr, $($fmt: tt)+) => {
        if !$cond {
            let msg = format!($($fmt)+);
            log::debug!("invalid argument: {}", msg);
            return Err($crate::errors::Error::InvalidArgument(msg));
        }
    };
}

//return Corrupted if the condition does not hold.
#[macro_export]
macro_rules! ensure_format {
    ($cond: expr, $($fmt: tt)+) => {
        if !$cond {
            let msg = format!($($fmt)+);
            log::error!("corrupted heap file: {}", msg);
            return Err($crate::errors::Error::Corrupted(msg));
        }
    };
}
