use anyhow::bail;
use opencv::{
    core::{Mat, MatTraitConst, Point, Rect, Size, CV_8UC1, CV_8UC3, CV_8UC4},
    imgproc::{
        cvt_color_def, get_structuring_element, median_blur, morphology_ex_def, COLOR_BGR2GRAY,
        COLOR_BGRA2GRAY, MORPH_OPEN, MORPH_RECT,
    },
};
use pupil::Roi;

/// Crop, grayscale, median blur and a square opening, in that order.
pub fn preprocess_image(
    img: &Mat,
    roi: Option<&Roi>,
    blur_kernel_size: i32,
    morph_kernel_size: i32,
) -> anyhow::Result<Mat> {
    let gray = match roi {
        Some(roi) => to_gray(&crop(img, roi)?)?,
        None => to_gray(img)?,
    };

    open_blurred(&gray, blur_kernel_size, morph_kernel_size)
}

pub fn to_gray(img: &Mat) -> anyhow::Result<Mat> {
    let mut img_gray = Mat::default();
    match img.typ() {
        CV_8UC1 => {
            img_gray = img.try_clone()?;
        },
        CV_8UC3 => {
            cvt_color_def(img, &mut img_gray, COLOR_BGR2GRAY)?;
        },
        CV_8UC4 => {
            cvt_color_def(img, &mut img_gray, COLOR_BGRA2GRAY)?;
        },
        _ => {
            bail!("Image of unknown color type");
        }
    }

    Ok(img_gray)
}

/// Copies the part of `roi` that overlaps the image.
pub fn crop(img: &Mat, roi: &Roi) -> anyhow::Result<Mat> {
    let Some(r) = roi.clamped(img.cols(), img.rows()) else {
        bail!("Roi {roi:?} lies outside the {}x{} image", img.cols(), img.rows());
    };
    let cropped = Mat::roi(img, Rect::new(r.x, r.y, r.width, r.height))?.clone_pointee();

    Ok(cropped)
}

pub fn open_blurred(img_gray: &Mat, blur_kernel_size: i32, morph_kernel_size: i32) -> anyhow::Result<Mat> {
    let mut img_blur = Mat::default();
    median_blur(img_gray, &mut img_blur, blur_kernel_size)?;

    let kernel = get_structuring_element(
        MORPH_RECT,
        Size::new(morph_kernel_size, morph_kernel_size),
        Point::new(-1, -1),
    )?;
    let mut opening = Mat::default();
    morphology_ex_def(&img_blur, &mut opening, MORPH_OPEN, &kernel)?;

    Ok(opening)
}
