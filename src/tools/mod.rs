mod exiftool;
mod ffprobe_info;
mod file_times;
mod frame_reader;
mod path_validator;
mod video_scanner;

pub use exiftool::{
    ExifTool, FILE_CREATE_DATE, FILE_CREATE_DATE_SUPPORTED, FILE_MODIFY_DATE, QUICKTIME_CREATE_DATE,
    QUICKTIME_MEDIA_CREATE_DATE, QUICKTIME_MEDIA_MODIFY_DATE, QUICKTIME_MODIFY_DATE,
    format_exif_datetime, parse_exif_datetime,
};
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use file_times::set_file_times;
pub use frame_reader::{Frame, FrameReader, PixelFormat};
pub use path_validator::{ensure_directory_exists, rename_no_clobber, validate_directory_exists};
pub use video_scanner::list_videos;
